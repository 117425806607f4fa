//! SchemaXtract LLM Provider Layer
//!
//! Pluggable LLM provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `schemaxtract-domain`. Every provider exposes the same single-prompt
//! `complete` operation; failures are reported as [`LlmError`] and are never
//! retried unless the provider is explicitly configured to.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use schemaxtract_llm::MockProvider;
//! use schemaxtract_domain::traits::LlmProvider;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = MockProvider::new("Total: $10");
//! let result = provider.complete("test prompt").await.unwrap();
//! assert_eq!(result, "Total: $10");
//! # });
//! ```

#![warn(missing_docs)]

pub mod openai;

use schemaxtract_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// API key missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request did not complete within the transport timeout
    #[error("Request timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::RateLimitExceeded(_) | LlmError::Timeout
        )
    }
}

/// Canned reply for a mock prompt
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Specific replies are keyed by a fragment of the prompt; the first registered
/// fragment contained in the prompt wins.
///
/// # Examples
///
/// ```
/// use schemaxtract_llm::MockProvider;
/// use schemaxtract_domain::traits::LlmProvider;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.complete("any prompt").await.unwrap(), "Fixed response");
///
/// // Replies keyed by prompt content
/// let mut provider = MockProvider::default();
/// provider.add_response("page one", "Total: $1");
/// provider.add_response("page two", "Total: $2");
/// assert_eq!(provider.complete("... page two ...").await.unwrap(), "Total: $2");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model_name: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model_name: "mock".to_string(),
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` to prompts containing `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((fragment.into(), MockReply::Text(response.into())));
    }

    /// Configure to fail for prompts containing `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((fragment.into(), MockReply::Error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Reset the recorded prompts
    pub fn reset_call_count(&self) {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn reply_for(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        match responses.iter().find(|(fragment, _)| prompt.contains(fragment.as_str())) {
            Some((_, MockReply::Text(text))) => Ok(text.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Communication("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.reply_for(prompt)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
