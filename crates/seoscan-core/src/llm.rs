//! Structured-output model trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::Result;

/// Configuration for a structured generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "ibm/granite-4-h-small".to_string(),
            max_tokens: 1200,
            temperature: Some(0.2),
            top_p: Some(1.0),
            top_k: Some(50),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Trait for generative backends that support structured output
///
/// The contract is "prompt in, schema-shaped JSON object out": callers supply
/// a system instruction, a task prompt, and a JSON schema description, and the
/// backend returns a `serde_json::Value` that is expected to conform to that
/// schema. Callers re-validate by deserializing into their own strict types;
/// a parse failure is treated the same as a backend failure.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Connect/authenticate with the model backend
    async fn connect(&mut self) -> Result<()>;

    /// Generate a structured JSON object for the given instruction and task
    async fn generate_structured(
        &self,
        system: &str,
        task: &str,
        schema: &str,
    ) -> Result<Value>;

    /// Generate with custom configuration
    async fn generate_structured_with_config(
        &self,
        system: &str,
        task: &str,
        schema: &str,
        config: &GenerationConfig,
    ) -> Result<Value>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
