//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokenizer used to measure chunk and prompt sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// tiktoken `cl100k_base` BPE
    Cl100k,
    /// Roughly 4 characters per token
    Approximate,
}

impl Default for TokenizerKind {
    fn default() -> Self {
        TokenizerKind::Cl100k
    }
}

/// How chunks are sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Single request when the whole document fits the prompt budget, per-chunk otherwise
    Auto,
    /// One request with every chunk concatenated
    Single,
    /// One request per chunk, answers merged in chunk order
    PerChunk,
}

impl Default for RequestMode {
    fn default() -> Self {
        RequestMode::Auto
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestMode::Auto => "auto",
            RequestMode::Single => "single",
            RequestMode::PerChunk => "per-chunk",
        };
        f.write_str(name)
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum tokens per chunk
    pub max_chunk_tokens: usize,

    /// Tokens shared between consecutive chunks
    pub chunk_overlap_tokens: usize,

    /// Tokenizer used for every size budget
    pub tokenizer: TokenizerKind,

    /// How chunks are dispatched to the model
    pub request_mode: RequestMode,

    /// Largest prompt `auto` mode sends in a single request
    pub max_prompt_tokens: usize,

    /// Per-chunk requests allowed in flight at once
    pub concurrency: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_tokens == 0 {
            return Err("max_chunk_tokens must be greater than 0".to_string());
        }
        if self.chunk_overlap_tokens >= self.max_chunk_tokens {
            return Err("chunk_overlap_tokens must be smaller than max_chunk_tokens".to_string());
        }
        if self.max_prompt_tokens <= self.max_chunk_tokens {
            return Err("max_prompt_tokens must exceed max_chunk_tokens".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration sized for a 128k-context chat model
    fn default() -> Self {
        Self {
            max_chunk_tokens: 10_000,
            chunk_overlap_tokens: 1_000,
            tokenizer: TokenizerKind::Cl100k,
            request_mode: RequestMode::Auto,
            max_prompt_tokens: 100_000,
            concurrency: 1,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: small chunks sent one per request, several in flight
    pub fn aggressive() -> Self {
        Self {
            max_chunk_tokens: 4_000,
            chunk_overlap_tokens: 400,
            tokenizer: TokenizerKind::Cl100k,
            request_mode: RequestMode::PerChunk,
            max_prompt_tokens: 16_000,
            concurrency: 4,
        }
    }

    /// Lenient preset: large chunks, prefer a single request
    pub fn lenient() -> Self {
        Self {
            max_chunk_tokens: 16_000,
            chunk_overlap_tokens: 1_600,
            tokenizer: TokenizerKind::Cl100k,
            request_mode: RequestMode::Auto,
            max_prompt_tokens: 120_000,
            concurrency: 1,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
