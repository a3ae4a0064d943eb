//! Simplified analysis facade
//!
//! Adapts orchestrator output into the compact per-suggestion-scored shape
//! consumed by the scan API: transform, batch-analyze, then re-rank each
//! suggestion with a priority-and-type heuristic score independent of the
//! field-score system.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::input::ParallelAnalysisInput;
use crate::orchestrator::ParallelSeoAnalyzer;
use crate::report::{Priority, Suggestion, SuggestionType};
use crate::transformer::{ProductTransformer, RawProduct};
use seoscan_core::{BrandContext, StructuredModel};

/// A suggestion plus its derived UI-ranking score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub score: i32,
}

/// Compact per-product analysis for the scan API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedProductAnalysis {
    pub product_id: String,
    pub title: String,
    pub handle: String,
    pub overall_score: i32,
    pub suggestions: Vec<SimplifiedSuggestion>,
}

/// Base score by priority for the ranking heuristic
fn priority_base(priority: Priority) -> f64 {
    match priority {
        Priority::High => 20.0,
        Priority::Medium => 15.0,
        Priority::Low => 10.0,
    }
}

/// Ranking multiplier by suggestion type; unlisted types get 0.8
fn type_multiplier(suggestion_type: SuggestionType) -> f64 {
    match suggestion_type {
        SuggestionType::Title => 1.0,
        SuggestionType::MetaDescription => 0.95,
        SuggestionType::Description => 0.9,
        SuggestionType::AltText => 0.85,
        SuggestionType::StructuredData => 0.75,
        SuggestionType::Keywords => 0.7,
        SuggestionType::DuplicateContent => 0.6,
        _ => 0.8,
    }
}

/// Derived ranking score for one suggestion
pub fn suggestion_score(suggestion: &Suggestion) -> i32 {
    (priority_base(suggestion.priority) * type_multiplier(suggestion.suggestion_type)).round()
        as i32
}

/// Derive a URL-safe handle from a product title
pub fn derive_handle(title: &str) -> String {
    let lower = title.to_lowercase();
    let mut handle = String::with_capacity(lower.len());
    let mut last_hyphen = false;

    for c in lower.chars() {
        let mapped = if c.is_whitespace() { '-' } else { c };
        if mapped == '-' {
            if !last_hyphen && !handle.is_empty() {
                handle.push('-');
            }
            last_hyphen = true;
        } else if mapped.is_alphanumeric() {
            handle.push(mapped);
            last_hyphen = false;
        }
        // anything else is stripped
    }

    handle.trim_end_matches('-').to_string()
}

/// Facade over transformer + orchestrator
pub struct SimplifiedAnalyzer {
    transformer: ProductTransformer,
    analyzer: ParallelSeoAnalyzer,
}

impl SimplifiedAnalyzer {
    /// Heuristic-only facade, used when no model backend is configured
    pub fn new() -> Self {
        Self {
            transformer: ProductTransformer::new(),
            analyzer: ParallelSeoAnalyzer::new(),
        }
    }

    pub fn with_model(model: Arc<dyn StructuredModel>) -> Self {
        Self {
            transformer: ProductTransformer::new(),
            analyzer: ParallelSeoAnalyzer::with_model(model),
        }
    }

    pub fn with_brand_context(mut self, brand: BrandContext) -> Self {
        self.analyzer = self.analyzer.with_brand_context(brand);
        self
    }

    /// Analyze raw products end to end; never fails, always returns one
    /// entry per input product
    pub async fn analyze_products_simplified(
        &self,
        products: &[RawProduct],
    ) -> Vec<SimplifiedProductAnalysis> {
        let inputs: Vec<ParallelAnalysisInput> = products
            .iter()
            .map(|product| {
                let input = self.transformer.transform(product);
                let report = self.transformer.validate(&input);
                if !report.is_valid {
                    log::warn!(
                        "product {} failed soft validation: {}",
                        input.product_id(),
                        report.errors.join("; ")
                    );
                }
                input
            })
            .collect();

        let results = self.analyzer.analyze_multiple_products(&inputs).await;

        products
            .iter()
            .zip(results)
            .map(|(raw, result)| SimplifiedProductAnalysis {
                product_id: result.product_id.clone(),
                title: raw.title.clone(),
                handle: derive_handle(&raw.title),
                overall_score: result.overall_score,
                suggestions: result
                    .all_suggestions
                    .into_iter()
                    .map(|suggestion| {
                        let score = suggestion_score(&suggestion);
                        SimplifiedSuggestion { suggestion, score }
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for SimplifiedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
