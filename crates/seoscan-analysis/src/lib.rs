//! Parallel multi-worker SEO analysis engine for SEOScan
//!
//! Raw product JSON flows through the transformer into four aspect-specific
//! input shapes, the orchestrator fans those out to four analysis workers
//! concurrently, and the results are folded into one weighted score plus a
//! merged, priority-sorted suggestion list. Every failure mode degrades to a
//! complete, lower-confidence result; no error escapes the batch entry points.

pub mod input;
pub mod judges;
pub mod orchestrator;
pub mod prompt;
pub mod report;
pub mod schema;
pub mod simplified;
pub mod transformer;
pub mod worker;

#[cfg(test)]
mod tests;

pub use input::{
    ImageInput, MetafieldInput, ParallelAnalysisInput, PriorAnalysis, ProductContentInput,
    SeoMetadataInput, SuggestionRecord,
};
pub use orchestrator::ParallelSeoAnalyzer;
pub use report::{
    AnalysisResult, AnalysisSummary, AnalysisType, FieldScore, ParallelAnalysisResult, Priority,
    Suggestion, SuggestionType,
};
pub use simplified::{SimplifiedAnalyzer, SimplifiedProductAnalysis, SimplifiedSuggestion};
pub use transformer::{ProductTransformer, RawProduct, ValidationReport};
pub use worker::{AnalysisWorker, AspectJudge};

// Re-export core types
pub use seoscan_core::{BrandContext, Error, Result, StructuredModel};
