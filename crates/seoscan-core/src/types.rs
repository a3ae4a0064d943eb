//! Common types used across the SEOScan system

use serde::{Deserialize, Serialize};

/// Merchant-supplied brand voice context
///
/// When present, every analysis worker appends the brand name and tone to its
/// model-facing instructions so that suggested copy matches the shop's voice.
/// When absent, workers fall back to their fixed default persona.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandContext {
    pub brand_name: String,
    pub tone: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub guidelines: String,
}

impl BrandContext {
    /// Render the prompt fragment appended to worker instructions
    pub fn prompt_fragment(&self) -> String {
        let mut fragment = format!("Brand: {}. Tone: {}.", self.brand_name, self.tone);
        if !self.keywords.is_empty() {
            fragment.push_str(&format!(" Keywords: {}.", self.keywords.join(", ")));
        }
        if !self.guidelines.is_empty() {
            fragment.push_str(&format!(" Guidelines: {}", self.guidelines));
        }
        fragment
    }
}
