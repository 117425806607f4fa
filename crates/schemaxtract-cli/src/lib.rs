//! SchemaXtract CLI library.
//!
//! This library provides the core functionality for the SchemaXtract command-line interface,
//! including configuration management, schema entry, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod interactive;
pub mod output;
pub mod schema_input;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
