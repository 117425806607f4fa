//! SchemaXtract Domain Layer
//!
//! This crate contains the domain model for SchemaXtract. It has ZERO external
//! dependencies and defines the value objects and trait interfaces that all
//! other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Schema field**: A user-declared (name, description) pair naming one entity to extract
//! - **Schema set**: The ordered collection of fields for one extraction request
//! - **Page text**: The text of one PDF page as produced by a text source
//! - **Document chunk**: A bounded slice of document text sized for the model's input limit
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure implementations (PDF parsing, HTTP clients) live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentChunk, PageSpan, PageText};
pub use schema::{SchemaField, SchemaSet};
