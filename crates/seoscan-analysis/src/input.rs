//! Per-aspect analysis input shapes
//!
//! Immutable value records produced by the transformer and consumed by the
//! workers. Each worker sees only the narrow slice of product data it judges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A previously issued suggestion, carried as history for the content worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub field: String,
    pub suggested: String,
    pub accepted: bool,
}

/// Summary of an earlier analysis run for the same product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorAnalysis {
    pub score: i32,
    pub analyzed_at: DateTime<Utc>,
    pub content_hash: String,
    pub ai_generated: bool,
}

/// Input for the product content worker (title + plain-text description)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContentInput {
    pub product_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub suggestion_history: Vec<SuggestionRecord>,
    #[serde(default)]
    pub prior_analysis: Option<PriorAnalysis>,
}

/// Input for the SEO metadata worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadataInput {
    pub product_id: String,
    pub seo_title: String,
    pub seo_description: String,
}

/// One product image as seen by the image worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    pub product_id: String,
    pub image_id: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub alt_text: String,
}

/// One SEO-relevant metafield as seen by the metafields worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldInput {
    pub product_id: String,
    pub metafield_id: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
}

/// The full fan-out input for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelAnalysisInput {
    pub product_content: ProductContentInput,
    pub seo_metadata: SeoMetadataInput,
    pub images: Vec<ImageInput>,
    pub metafields: Vec<MetafieldInput>,
}

impl ParallelAnalysisInput {
    pub fn product_id(&self) -> &str {
        &self.product_content.product_id
    }
}
