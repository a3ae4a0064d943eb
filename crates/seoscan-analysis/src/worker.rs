//! Generic analysis worker
//!
//! The four workers share one algorithm and differ only in prompt text,
//! response gating, and heuristic-fallback arithmetic, so the shared part
//! lives here and the per-aspect part is an `AspectJudge` implementation.

use std::sync::Arc;

use crate::prompt;
use crate::report::{AnalysisResult, AnalysisType};
use crate::schema::{self, ModelResponse};
use seoscan_core::{BrandContext, Error, Result, StructuredModel};

/// Per-aspect specialization plugged into `AnalysisWorker`
pub trait AspectJudge: Send + Sync {
    type Input: Send + Sync;

    fn aspect(&self) -> AnalysisType;

    /// Role persona prepended to the system instruction
    fn persona(&self) -> &'static str;

    /// Task prompt describing what to judge for this input
    fn task_prompt(&self, product_id: &str, input: &Self::Input) -> String;

    /// Deterministic scorer used when the model path fails; must never panic
    /// and always returns a complete result with `"Fallback analysis:"`
    /// prefixed feedback
    fn heuristic(&self, product_id: &str, input: &Self::Input) -> AnalysisResult;

    /// Whether responses go through the strict validity gate
    fn strict_gate(&self) -> bool {
        false
    }
}

/// One analysis worker: a judge plus an optional model backend
///
/// `analyze` is infallible by contract. Model-call failures, timeouts,
/// malformed responses, and gate rejections are all absorbed here and
/// degrade to the judge's heuristic result.
pub struct AnalysisWorker<J: AspectJudge> {
    judge: J,
    model: Option<Arc<dyn StructuredModel>>,
}

impl<J: AspectJudge> AnalysisWorker<J> {
    /// Heuristic-only worker, used when no backend is configured
    pub fn new(judge: J) -> Self {
        Self { judge, model: None }
    }

    pub fn with_model(judge: J, model: Arc<dyn StructuredModel>) -> Self {
        Self {
            judge,
            model: Some(model),
        }
    }

    pub fn aspect(&self) -> AnalysisType {
        self.judge.aspect()
    }

    pub async fn analyze(
        &self,
        product_id: &str,
        input: &J::Input,
        brand: Option<&BrandContext>,
    ) -> AnalysisResult {
        match self.model_analysis(product_id, input, brand).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "{} worker falling back to heuristic scoring: {}",
                    self.judge.aspect().label(),
                    e
                );
                self.judge.heuristic(product_id, input)
            }
        }
    }

    async fn model_analysis(
        &self,
        product_id: &str,
        input: &J::Input,
        brand: Option<&BrandContext>,
    ) -> Result<AnalysisResult> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| Error::Configuration("no model backend configured".to_string()))?;

        let system = prompt::build_system(self.judge.persona(), brand);
        let task = self.judge.task_prompt(product_id, input);

        let value = model
            .generate_structured(&system, &task, prompt::RESPONSE_SCHEMA)
            .await?;

        let response: ModelResponse =
            serde_json::from_value(value).map_err(|e| Error::Serialization(e.to_string()))?;

        if self.judge.strict_gate() {
            schema::validate_strict(&response)?;
        }

        Ok(schema::repair(self.judge.aspect(), product_id, response))
    }
}
