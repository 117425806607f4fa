//! Request and response types for extraction

use crate::config::RequestMode;
use std::collections::HashMap;
use std::fmt;

/// Sentinel used when a field has no answer in the model's response
pub const NOT_FOUND: &str = "not found";

/// Answer for one schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The model returned a value
    Found(String),
    /// No value for this field
    NotFound,
}

impl FieldValue {
    /// Interpret a raw answer, mapping empty text and the sentinel to `NotFound`
    pub fn from_answer(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(NOT_FOUND) {
            FieldValue::NotFound
        } else {
            FieldValue::Found(value.to_string())
        }
    }

    /// Whether the model returned a value
    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }

    /// Display text, the sentinel for missing values
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(value) => value,
            FieldValue::NotFound => NOT_FOUND,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed answers keyed by schema field name
pub type FieldValues = HashMap<String, FieldValue>;

static MISSING: FieldValue = FieldValue::NotFound;

/// Result of an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// One value per schema field
    pub values: FieldValues,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Value for a field, `NotFound` if the field is unknown
    pub fn get(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&MISSING)
    }

    /// Number of fields with a value
    pub fn found_count(&self) -> usize {
        self.values.values().filter(|v| v.is_found()).count()
    }
}

/// Metadata about an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Name of the LLM model used
    pub model_name: String,

    /// Mode actually used (never `Auto`)
    pub mode: RequestMode,

    /// Number of chunks the document was split into
    pub chunk_count: usize,

    /// Model responses received
    pub requests_completed: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
