//! SchemaXtract Extractor
//!
//! Extracts user-defined entities from document text using an LLM.
//!
//! # Overview
//!
//! The user declares a set of schema fields (name plus description). The
//! document text is split into token-bounded chunks, a format contract tells
//! the model to answer with one `Name: value` line per field, and the answer
//! is parsed back into one value per field. Fields the model could not answer
//! resolve to the `not found` sentinel.
//!
//! # Architecture
//!
//! ```text
//! PDF → TextSource → TextChunker → PromptBuilder → LLM → FormatContract → rows/JSON
//! ```
//!
//! # Key Features
//!
//! - **Token-bounded chunking**: Paragraph, line, sentence and word boundaries with overlap
//! - **Format contract**: Deterministic instructions with a fenced template and a lenient parser
//! - **Request modes**: One request for the whole document, or one per chunk merged in order
//! - **Export**: Rows in declaration order, JSON with `Entity Name`/`Response` keys
//!
//! # Example Usage
//!
//! ```no_run
//! use schemaxtract_domain::SchemaSet;
//! use schemaxtract_extractor::{to_json, to_rows, Extractor, ExtractorConfig, PdfTextSource};
//! use schemaxtract_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("Invoice Number: INV-2024-001\nTotal: $452.10");
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//!
//! let mut schema = SchemaSet::new();
//! schema.add("Invoice Number", "The invoice's unique ID");
//! schema.add("Total", "The total amount due");
//!
//! let bytes = std::fs::read("invoice.pdf")?;
//! let result = extractor
//!     .extract_document(&PdfTextSource::new(), &bytes, &schema)
//!     .await?;
//!
//! println!("{}", to_json(&to_rows(&schema, &result))?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod prompt;
mod chunking;
mod contract;
mod parser;
mod pdf;
mod presenter;
mod extractor;


pub use error::ExtractorError;
pub use config::{ExtractorConfig, RequestMode, TokenizerKind};
pub use types::{ExtractionMetadata, ExtractionResult, FieldValue, FieldValues, NOT_FOUND};
pub use chunking::{TextChunker, Tokenizer};
pub use contract::FormatContract;
pub use prompt::PromptBuilder;
pub use pdf::PdfTextSource;
pub use presenter::{from_json, to_json, to_json_pretty, to_rows, ResultRow};
pub use extractor::Extractor;
