//! Integration tests for the analysis pipeline

#[cfg(test)]
mod pipeline_tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use insta::assert_yaml_snapshot;
    use serde_json::{json, Value};

    use crate::judges::{ContentJudge, ImageJudge};
    use crate::report::Priority;
    use crate::transformer::{ProductTransformer, RawProduct};
    use crate::worker::AnalysisWorker;
    use crate::{ParallelSeoAnalyzer, SimplifiedAnalyzer};
    use seoscan_core::{Error, GenerationConfig, Result, StructuredModel};

    /// Backend double that always returns the same JSON value
    struct StaticModel {
        value: Value,
    }

    #[async_trait]
    impl StructuredModel for StaticModel {
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        async fn generate_structured(
            &self,
            _system: &str,
            _task: &str,
            _schema: &str,
        ) -> Result<Value> {
            Ok(self.value.clone())
        }

        async fn generate_structured_with_config(
            &self,
            system: &str,
            task: &str,
            schema: &str,
            _config: &GenerationConfig,
        ) -> Result<Value> {
            self.generate_structured(system, task, schema).await
        }

        fn model_id(&self) -> &str {
            "static-test-model"
        }
    }

    /// Backend double that always fails
    struct FailingModel;

    #[async_trait]
    impl StructuredModel for FailingModel {
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        async fn generate_structured(
            &self,
            _system: &str,
            _task: &str,
            _schema: &str,
        ) -> Result<Value> {
            Err(Error::Network("connection refused".to_string()))
        }

        async fn generate_structured_with_config(
            &self,
            _system: &str,
            _task: &str,
            _schema: &str,
            _config: &GenerationConfig,
        ) -> Result<Value> {
            Err(Error::Network("connection refused".to_string()))
        }

        fn model_id(&self) -> &str {
            "failing-test-model"
        }
    }

    /// Backend double whose calls panic, killing the worker task outright
    struct PanickingModel;

    #[async_trait]
    impl StructuredModel for PanickingModel {
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        async fn generate_structured(
            &self,
            _system: &str,
            _task: &str,
            _schema: &str,
        ) -> Result<Value> {
            panic!("backend crashed");
        }

        async fn generate_structured_with_config(
            &self,
            _system: &str,
            _task: &str,
            _schema: &str,
            _config: &GenerationConfig,
        ) -> Result<Value> {
            panic!("backend crashed");
        }

        fn model_id(&self) -> &str {
            "panicking-test-model"
        }
    }

    fn raw_product(json: Value) -> RawProduct {
        serde_json::from_value(json).unwrap()
    }

    fn sample_product(id: &str) -> RawProduct {
        raw_product(json!({
            "id": id,
            "title": "Organic Cotton Crew Neck T-Shirt - Navy",
            "bodyHtml": "<p>A soft, breathable tee made from 100% organic cotton. \
                Pre-shrunk fabric holds its shape wash after wash.</p>",
            "seo": {"title": "Great Shoes", "description": ""},
            "images": {"edges": [
                {"node": {"id": "img1", "url": "https://cdn.shop.com/files/a.png", "altText": ""}}
            ]},
            "metafields": [
                {"id": "m1", "namespace": "global", "key": "title_tag",
                 "value": "Organic Cotton Tee | Navy Blue Crew"}
            ]
        }))
    }

    #[tokio::test]
    async fn test_worker_uses_model_response() {
        let model = Arc::new(StaticModel {
            value: json!({
                "score": 88,
                "fieldScores": [
                    {"field": "Product Title", "score": 90, "description": "strong title"},
                    {"field": "Product Description", "score": 86, "description": "good copy"}
                ],
                "suggestions": [],
                "feedback": "Content is in good shape."
            }),
        });
        let worker = AnalysisWorker::with_model(ContentJudge, model);
        let input = ProductTransformer::new()
            .transform(&sample_product("p1"))
            .product_content;

        let result = worker.analyze("p1", &input, None).await;
        assert_eq!(result.score, 88);
        assert_eq!(result.feedback, "Content is in good shape.");
    }

    #[tokio::test]
    async fn test_worker_falls_back_on_model_failure() {
        let worker = AnalysisWorker::with_model(ContentJudge, Arc::new(FailingModel));
        let input = ProductTransformer::new()
            .transform(&sample_product("p1"))
            .product_content;

        let result = worker.analyze("p1", &input, None).await;
        assert!(result.feedback.starts_with("Fallback analysis:"));
        // deterministic: a second call produces the identical result
        let again = worker.analyze("p1", &input, None).await;
        assert_eq!(result, again);
    }

    #[tokio::test]
    async fn test_worker_falls_back_on_malformed_response() {
        let model = Arc::new(StaticModel {
            value: json!({"score": "not a number"}),
        });
        let worker = AnalysisWorker::with_model(ContentJudge, model);
        let input = ProductTransformer::new()
            .transform(&sample_product("p1"))
            .product_content;

        let result = worker.analyze("p1", &input, None).await;
        assert!(result.feedback.starts_with("Fallback analysis:"));
    }

    #[tokio::test]
    async fn test_image_worker_gates_placeholder_response() {
        let model = Arc::new(StaticModel {
            value: json!({
                "score": 75,
                "fieldScores": [{"field": "Image 1 Alt Text", "score": 75, "description": "d"}],
                "suggestions": [],
                "feedback": "Image analysis in progress. Please wait."
            }),
        });
        let worker = AnalysisWorker::with_model(ImageJudge::new(), model);
        let images = ProductTransformer::new().transform(&sample_product("p1")).images;

        let result = worker.analyze("p1", &images, None).await;
        assert!(result.feedback.starts_with("Fallback analysis:"));
    }

    #[tokio::test]
    async fn test_suggestion_count_conservation_and_sort() {
        let analyzer = ParallelSeoAnalyzer::new();
        let input = ProductTransformer::new().transform(&sample_product("p1"));

        let result = analyzer.analyze_product_seo(&input).await;

        let per_aspect = result.product_content.suggestions.len()
            + result.seo_metadata.suggestions.len()
            + result.images.suggestions.len()
            + result.metafields.suggestions.len();
        assert_eq!(result.all_suggestions.len(), per_aspect);
        assert!(!result.all_suggestions.is_empty());

        for pair in result.all_suggestions.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.priority.rank() <= b.priority.rank());
            if a.priority == b.priority {
                assert!(a.suggestion_type.as_str() <= b.suggestion_type.as_str());
            }
        }
    }

    #[tokio::test]
    async fn test_overall_score_in_bounds() {
        let analyzer = ParallelSeoAnalyzer::new();
        let transformer = ProductTransformer::new();

        let products = vec![
            sample_product("p1"),
            raw_product(json!({"id": "p2", "title": ""})),
            raw_product(json!({"id": "p3", "title": "x", "images": [], "metafields": []})),
        ];

        for product in &products {
            let result = analyzer.analyze_product_seo(&transformer.transform(product)).await;
            assert!((0..=100).contains(&result.overall_score));
            for aspect in [
                &result.product_content,
                &result.seo_metadata,
                &result.images,
                &result.metafields,
            ] {
                assert!((0..=100).contains(&aspect.score));
                for field_score in &aspect.field_scores {
                    assert!((0..=100).contains(&field_score.score));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_cardinality() {
        let analyzer = ParallelSeoAnalyzer::new();
        let transformer = ProductTransformer::new();

        let inputs: Vec<_> = (0..5)
            .map(|i| transformer.transform(&sample_product(&format!("p{}", i))))
            .collect();

        let results = analyzer.analyze_multiple_products(&inputs).await;
        assert_eq!(results.len(), 5);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.product_id, format!("p{}", i));
        }
    }

    #[tokio::test]
    async fn test_panicking_backend_degrades_to_neutral_results() {
        let analyzer = ParallelSeoAnalyzer::with_model(Arc::new(PanickingModel));
        let transformer = ProductTransformer::new();

        let inputs = vec![
            transformer.transform(&sample_product("p1")),
            transformer.transform(&sample_product("p2")),
        ];
        let results = analyzer.analyze_multiple_products(&inputs).await;

        assert_eq!(results.len(), 2);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.product_id, format!("p{}", i + 1));
            assert_eq!(result.overall_score, 50);
            assert!(result.all_suggestions.is_empty());
            for aspect in [
                &result.product_content,
                &result.seo_metadata,
                &result.images,
                &result.metafields,
            ] {
                assert_eq!(aspect.score, 50);
                assert!(aspect.suggestions.is_empty());
                assert!(aspect.field_scores.is_empty());
                assert!(aspect.feedback.contains("analysis failed - using neutral result"));
            }
        }
    }

    #[tokio::test]
    async fn test_analysis_summary() {
        let analyzer = ParallelSeoAnalyzer::new();
        let transformer = ProductTransformer::new();

        let inputs = vec![
            transformer.transform(&sample_product("p1")),
            transformer.transform(&sample_product("p2")),
        ];
        let results = analyzer.analyze_multiple_products(&inputs).await;
        let summary = ParallelSeoAnalyzer::analysis_summary(&results);

        assert_eq!(summary.average_score, results[0].overall_score);
        assert_eq!(
            summary.total_suggestions,
            results.iter().map(|r| r.all_suggestions.len()).sum::<usize>()
        );
        assert_eq!(
            summary.high_priority_suggestions,
            results
                .iter()
                .flat_map(|r| &r.all_suggestions)
                .filter(|s| s.priority == Priority::High)
                .count()
        );
    }

    #[tokio::test]
    async fn test_simplified_end_to_end() {
        let facade = SimplifiedAnalyzer::new();
        let products = vec![sample_product("p1"), sample_product("p2")];

        let analyses = facade.analyze_products_simplified(&products).await;

        assert_eq!(analyses.len(), 2);
        let first = &analyses[0];
        assert_eq!(first.handle, "organic-cotton-crew-neck-t-shirt-navy");
        assert!((0..=100).contains(&first.overall_score));
        assert!(first.suggestions.iter().all(|s| s.score > 0));
    }

    #[tokio::test]
    async fn test_heuristic_scores_snapshot() {
        let analyzer = ParallelSeoAnalyzer::new();
        let input = ProductTransformer::new().transform(&raw_product(json!({
            "id": "p1",
            "title": "Tee",
            "seo": {"title": "Great Shoes", "description": ""}
        })));

        let result = analyzer.analyze_product_seo(&input).await;
        let scores = (
            result.product_content.score,
            result.seo_metadata.score,
            result.images.score,
            result.metafields.score,
        );

        assert_yaml_snapshot!(scores, @r###"
        ---
        - 33
        - 45
        - 50
        - 63
        "###);
    }
}
