//! WatsonX AI integration for SEOScan
//!
//! This crate provides the WatsonX implementation of the StructuredModel trait.

mod client;
mod config;


pub use client::WatsonxClient;
pub use config::WatsonxConfig;

// Re-export core types for convenience
pub use seoscan_core::{Error, GenerationConfig, Result, StructuredModel};
