//! Parallel analysis orchestrator
//!
//! Fans one product out to the four workers concurrently, folds their results
//! into a weighted overall score and a merged suggestion list, and batches
//! multi-product analysis with bounded concurrency. All-settle semantics
//! throughout: no single failure aborts the others, and the batch entry
//! points never return an error.

use std::sync::Arc;
use std::time::Instant;

use crate::input::ParallelAnalysisInput;
use crate::judges::{ContentJudge, ImageJudge, MetadataJudge, MetafieldJudge};
use crate::report::{
    AnalysisResult, AnalysisSummary, AnalysisType, ParallelAnalysisResult, Priority, Suggestion,
};
use crate::worker::AnalysisWorker;
use seoscan_core::{BrandContext, StructuredModel};

/// Products analyzed concurrently per batch chunk. With four workers each,
/// this bounds peak concurrency at 12 simultaneous model calls.
const BATCH_SIZE: usize = 3;

/// Pooled field-score weight, keyed by field name with per-aspect defaults
fn field_weight(field: &str, source: AnalysisType) -> f64 {
    match field {
        "Product Title" => 0.15,
        "Product Description" => 0.10,
        "SEO Title" => 0.20,
        "Meta Description" => 0.15,
        "Image 1 Alt Text" => 0.08,
        "Image 2 Alt Text" => 0.05,
        "Image 3 Alt Text" => 0.03,
        "Overall Image Quality" => 0.09,
        "SEO Metafields" => 0.08,
        "Structured Data" => 0.04,
        "Schema Markup" => 0.03,
        _ => match source {
            AnalysisType::ProductContent | AnalysisType::SeoMetadata => 0.05,
            AnalysisType::Images => 0.02,
            AnalysisType::Metafields => 0.03,
        },
    }
}

/// Aspect-level weights used only when no worker produced field scores
const ASPECT_WEIGHTS: [(AnalysisType, f64); 4] = [
    (AnalysisType::ProductContent, 0.30),
    (AnalysisType::SeoMetadata, 0.35),
    (AnalysisType::Images, 0.20),
    (AnalysisType::Metafields, 0.15),
];

/// Runs the four analysis workers concurrently per product
#[derive(Clone)]
pub struct ParallelSeoAnalyzer {
    content: Arc<AnalysisWorker<ContentJudge>>,
    metadata: Arc<AnalysisWorker<MetadataJudge>>,
    images: Arc<AnalysisWorker<ImageJudge>>,
    metafields: Arc<AnalysisWorker<MetafieldJudge>>,
    brand: Option<BrandContext>,
}

impl ParallelSeoAnalyzer {
    /// Heuristic-only analyzer, used when no model backend is configured
    pub fn new() -> Self {
        Self {
            content: Arc::new(AnalysisWorker::new(ContentJudge)),
            metadata: Arc::new(AnalysisWorker::new(MetadataJudge)),
            images: Arc::new(AnalysisWorker::new(ImageJudge::new())),
            metafields: Arc::new(AnalysisWorker::new(MetafieldJudge)),
            brand: None,
        }
    }

    pub fn with_model(model: Arc<dyn StructuredModel>) -> Self {
        Self {
            content: Arc::new(AnalysisWorker::with_model(ContentJudge, model.clone())),
            metadata: Arc::new(AnalysisWorker::with_model(MetadataJudge, model.clone())),
            images: Arc::new(AnalysisWorker::with_model(ImageJudge::new(), model.clone())),
            metafields: Arc::new(AnalysisWorker::with_model(MetafieldJudge, model)),
            brand: None,
        }
    }

    pub fn with_brand_context(mut self, brand: BrandContext) -> Self {
        self.brand = Some(brand);
        self
    }

    /// Analyze one product across all four aspects concurrently
    ///
    /// Workers already absorb model failures internally; the spawn-per-worker
    /// here is the second safety net, substituting a neutral result if a
    /// worker task dies outright.
    pub async fn analyze_product_seo(
        &self,
        input: &ParallelAnalysisInput,
    ) -> ParallelAnalysisResult {
        let started = Instant::now();
        let product_id = input.product_id().to_string();

        let content_task = {
            let worker = self.content.clone();
            let pid = product_id.clone();
            let content = input.product_content.clone();
            let brand = self.brand.clone();
            tokio::spawn(async move { worker.analyze(&pid, &content, brand.as_ref()).await })
        };
        let metadata_task = {
            let worker = self.metadata.clone();
            let pid = product_id.clone();
            let metadata = input.seo_metadata.clone();
            let brand = self.brand.clone();
            tokio::spawn(async move { worker.analyze(&pid, &metadata, brand.as_ref()).await })
        };
        let images_task = {
            let worker = self.images.clone();
            let pid = product_id.clone();
            let images = input.images.clone();
            let brand = self.brand.clone();
            tokio::spawn(async move { worker.analyze(&pid, &images, brand.as_ref()).await })
        };
        let metafields_task = {
            let worker = self.metafields.clone();
            let pid = product_id.clone();
            let metafields = input.metafields.clone();
            let brand = self.brand.clone();
            tokio::spawn(async move { worker.analyze(&pid, &metafields, brand.as_ref()).await })
        };

        let (content, metadata, images, metafields) =
            tokio::join!(content_task, metadata_task, images_task, metafields_task);

        let product_content =
            content.unwrap_or_else(|_| Self::neutral_aspect(AnalysisType::ProductContent));
        let seo_metadata =
            metadata.unwrap_or_else(|_| Self::neutral_aspect(AnalysisType::SeoMetadata));
        let images = images.unwrap_or_else(|_| Self::neutral_aspect(AnalysisType::Images));
        let metafields =
            metafields.unwrap_or_else(|_| Self::neutral_aspect(AnalysisType::Metafields));

        let results = [&product_content, &seo_metadata, &images, &metafields];
        let overall_score = Self::overall_score(&results);
        let all_suggestions = Self::merge_suggestions(&results);

        ParallelAnalysisResult {
            product_id,
            overall_score,
            product_content,
            seo_metadata,
            images,
            metafields,
            all_suggestions,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Analyze many products in fixed-size chunks with a strict barrier
    /// between chunks; always returns exactly `inputs.len()` results
    pub async fn analyze_multiple_products(
        &self,
        inputs: &[ParallelAnalysisInput],
    ) -> Vec<ParallelAnalysisResult> {
        let mut results = Vec::with_capacity(inputs.len());

        for chunk in inputs.chunks(BATCH_SIZE) {
            let handles: Vec<_> = chunk
                .iter()
                .map(|input| {
                    let analyzer = self.clone();
                    let input = input.clone();
                    tokio::spawn(async move { analyzer.analyze_product_seo(&input).await })
                })
                .collect();

            let settled = futures::future::join_all(handles).await;

            for (input, outcome) in chunk.iter().zip(settled) {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        log::error!(
                            "analysis of product {} failed: {}",
                            input.product_id(),
                            e
                        );
                        results.push(Self::neutral_product(input.product_id()));
                    }
                }
            }
        }

        results
    }

    /// Aggregate numbers across a batch of results
    pub fn analysis_summary(results: &[ParallelAnalysisResult]) -> AnalysisSummary {
        let average_score = if results.is_empty() {
            0
        } else {
            let sum: i32 = results.iter().map(|r| r.overall_score).sum();
            (sum as f64 / results.len() as f64).round() as i32
        };

        AnalysisSummary {
            average_score,
            total_suggestions: results.iter().map(|r| r.all_suggestions.len()).sum(),
            high_priority_suggestions: results
                .iter()
                .flat_map(|r| &r.all_suggestions)
                .filter(|s| s.priority == Priority::High)
                .count(),
            analysis_time_ms: results.iter().map(|r| r.execution_time_ms).sum(),
        }
    }

    /// Weighted overall score across the pooled field scores of all aspects;
    /// falls back to a coarse aspect-level average when no field scores exist
    fn overall_score(results: &[&AnalysisResult; 4]) -> i32 {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for result in results {
            for field_score in &result.field_scores {
                let weight = field_weight(&field_score.field, result.analysis_type);
                weighted_sum += field_score.score as f64 * weight;
                weight_sum += weight;
            }
        }

        if weight_sum > 0.0 {
            return (weighted_sum / weight_sum).round() as i32;
        }

        let aspect_sum: f64 = results
            .iter()
            .zip(ASPECT_WEIGHTS.iter())
            .map(|(result, (_, weight))| result.score as f64 * weight)
            .sum();
        aspect_sum.round() as i32
    }

    /// Concatenate all aspect suggestion lists, sorted by severity then by
    /// type string; the secondary key exists for deterministic output, not
    /// business significance
    fn merge_suggestions(results: &[&AnalysisResult; 4]) -> Vec<Suggestion> {
        let mut merged: Vec<Suggestion> = results
            .iter()
            .flat_map(|r| r.suggestions.iter().cloned())
            .collect();
        merged.sort_by_key(|s| (s.priority.rank(), s.suggestion_type.as_str()));
        merged
    }

    /// Neutral substitute for a worker task that died outright
    fn neutral_aspect(aspect: AnalysisType) -> AnalysisResult {
        AnalysisResult {
            score: 50,
            suggestions: Vec::new(),
            analysis_type: aspect,
            feedback: format!("{} analysis failed - using neutral result", aspect.label()),
            field_scores: Vec::new(),
        }
    }

    /// Fully-neutral substitute for a product whose analysis task died
    fn neutral_product(product_id: &str) -> ParallelAnalysisResult {
        ParallelAnalysisResult {
            product_id: product_id.to_string(),
            overall_score: 50,
            product_content: Self::neutral_aspect(AnalysisType::ProductContent),
            seo_metadata: Self::neutral_aspect(AnalysisType::SeoMetadata),
            images: Self::neutral_aspect(AnalysisType::Images),
            metafields: Self::neutral_aspect(AnalysisType::Metafields),
            all_suggestions: Vec::new(),
            execution_time_ms: 0,
        }
    }
}

impl Default for ParallelSeoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FieldScore;

    fn aspect_result(aspect: AnalysisType, score: i32, fields: &[(&str, i32)]) -> AnalysisResult {
        AnalysisResult {
            score,
            suggestions: Vec::new(),
            analysis_type: aspect,
            feedback: "test".to_string(),
            field_scores: fields
                .iter()
                .map(|(field, score)| FieldScore {
                    field: field.to_string(),
                    score: *score,
                    description: "test".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_overall_score_uses_field_weights() {
        let content = aspect_result(
            AnalysisType::ProductContent,
            0,
            &[("Product Title", 80), ("Product Description", 60)],
        );
        let metadata = aspect_result(
            AnalysisType::SeoMetadata,
            0,
            &[("SEO Title", 40), ("Meta Description", 70)],
        );
        let images = aspect_result(AnalysisType::Images, 0, &[]);
        let metafields = aspect_result(AnalysisType::Metafields, 0, &[]);

        let score =
            ParallelSeoAnalyzer::overall_score(&[&content, &metadata, &images, &metafields]);

        // (80*.15 + 60*.10 + 40*.20 + 70*.15) / (.15+.10+.20+.15) = 36.5/0.6
        assert_eq!(score, 61);
    }

    #[test]
    fn test_overall_score_unknown_fields_use_aspect_defaults() {
        let content = aspect_result(AnalysisType::ProductContent, 0, &[("Brand Voice", 90)]);
        let images = aspect_result(AnalysisType::Images, 0, &[("Image 9 URL", 30)]);
        let metadata = aspect_result(AnalysisType::SeoMetadata, 0, &[]);
        let metafields = aspect_result(AnalysisType::Metafields, 0, &[]);

        let score =
            ParallelSeoAnalyzer::overall_score(&[&content, &metadata, &images, &metafields]);

        // (90*.05 + 30*.02) / .07 = 5.1/0.07 = 72.857...
        assert_eq!(score, 73);
    }

    #[test]
    fn test_overall_score_falls_back_to_aspect_weights() {
        let content = aspect_result(AnalysisType::ProductContent, 80, &[]);
        let metadata = aspect_result(AnalysisType::SeoMetadata, 60, &[]);
        let images = aspect_result(AnalysisType::Images, 40, &[]);
        let metafields = aspect_result(AnalysisType::Metafields, 100, &[]);

        let score =
            ParallelSeoAnalyzer::overall_score(&[&content, &metadata, &images, &metafields]);

        // 80*.30 + 60*.35 + 40*.20 + 100*.15 = 24 + 21 + 8 + 15 = 68
        assert_eq!(score, 68);
    }

    #[test]
    fn test_neutral_substitutes() {
        let aspect = ParallelSeoAnalyzer::neutral_aspect(AnalysisType::Images);
        assert_eq!(aspect.score, 50);
        assert!(aspect.suggestions.is_empty());
        assert!(aspect.field_scores.is_empty());
        assert!(aspect.feedback.contains("analysis failed"));

        let product = ParallelSeoAnalyzer::neutral_product("p3");
        assert_eq!(product.product_id, "p3");
        assert_eq!(product.overall_score, 50);
        assert!(product.all_suggestions.is_empty());
        assert_eq!(product.execution_time_ms, 0);
    }
}
