//! Analysis result types
//!
//! Everything here is constructed fresh per analysis run and never mutated
//! afterwards; each run produces a new immutable result tree.

use serde::{Deserialize, Serialize};

/// The four analysis dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisType {
    ProductContent,
    SeoMetadata,
    Images,
    Metafields,
}

impl AnalysisType {
    /// Short tag used in suggestion ids
    pub fn tag(&self) -> &'static str {
        match self {
            AnalysisType::ProductContent => "content",
            AnalysisType::SeoMetadata => "metadata",
            AnalysisType::Images => "images",
            AnalysisType::Metafields => "metafields",
        }
    }

    /// Human-readable aspect name used in feedback text
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::ProductContent => "Product content",
            AnalysisType::SeoMetadata => "SEO metadata",
            AnalysisType::Images => "Image",
            AnalysisType::Metafields => "Metafields",
        }
    }
}

/// Suggestion priority; lower rank sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// The kind of content a suggestion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionType {
    Title,
    Description,
    MetaDescription,
    AltText,
    StructuredData,
    Metafield,
    Keywords,
    DuplicateContent,
    #[serde(other)]
    Other,
}

impl SuggestionType {
    /// Stable string form, used as the secondary sort key in merged lists
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::Title => "title",
            SuggestionType::Description => "description",
            SuggestionType::MetaDescription => "meta-description",
            SuggestionType::AltText => "alt-text",
            SuggestionType::StructuredData => "structured-data",
            SuggestionType::Metafield => "metafield",
            SuggestionType::Keywords => "keywords",
            SuggestionType::DuplicateContent => "duplicate-content",
            SuggestionType::Other => "other",
        }
    }
}

/// A named, scored sub-judgment within one aspect's analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScore {
    pub field: String,
    pub score: i32,
    pub description: String,
}

/// A concrete before/after content recommendation tied to one field
///
/// `current` and `suggested` always hold concrete content, never instructions
/// to generate content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub priority: Priority,
    pub field: String,
    pub current: String,
    pub suggested: String,
    pub reason: String,
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One aspect's analysis of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: i32,
    pub suggestions: Vec<Suggestion>,
    pub analysis_type: AnalysisType,
    pub feedback: String,
    pub field_scores: Vec<FieldScore>,
}

/// The combined judgment of all four workers for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelAnalysisResult {
    pub product_id: String,
    pub overall_score: i32,
    pub product_content: AnalysisResult,
    pub seo_metadata: AnalysisResult,
    pub images: AnalysisResult,
    pub metafields: AnalysisResult,
    pub all_suggestions: Vec<Suggestion>,
    pub execution_time_ms: u64,
}

/// Aggregate numbers across a batch of analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub average_score: i32,
    pub total_suggestions: usize,
    pub high_priority_suggestions: usize,
    pub analysis_time_ms: u64,
}

/// Clamp a score into the valid [0, 100] range
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(0, 100)
}

/// Uniform suggestion id scheme: `{aspect}:{product_id}:{field-slug}:{seq}`
pub fn suggestion_id(aspect: AnalysisType, product_id: &str, field: &str, seq: usize) -> String {
    let slug: String = field
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}:{}:{}:{}", aspect.tag(), product_id, slug, seq)
}
