//! Core traits and types for SEOScan
//!
//! This crate defines the fundamental traits and types used across the SEOScan
//! system. It provides the capability-facing interface for structured-output
//! generative model backends, plus the brand-context type injected into every
//! analysis prompt, making the system test-friendly and extensible.

pub mod error;
pub mod llm;
pub mod types;

pub use error::{Error, Result};
pub use llm::{GenerationConfig, StructuredModel};
pub use types::BrandContext;
