//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::PageText;
use std::future::Future;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (schemaxtract-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Complete a single prompt and return the model's raw text answer
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model answering the prompts (used for result metadata)
    fn model_name(&self) -> &str;
}

/// Trait for turning document bytes into ordered page text
///
/// Implemented by the application layer (schemaxtract-extractor)
pub trait TextSource {
    /// Error type for text extraction
    type Error;

    /// Extract the text of every page, in page order
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, Self::Error>;
}
