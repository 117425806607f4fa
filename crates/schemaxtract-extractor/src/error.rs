//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Every variant is reported to the user as a single message; none of them
/// is retried automatically.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Schema fields are missing, empty or duplicated
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document text could not be extracted
    #[error("Document error: {0}")]
    Source(String),

    /// LLM transport, authentication or quota failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model answer has no recognizable structured content
    #[error("Could not parse model response: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
