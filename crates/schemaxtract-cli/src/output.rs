//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use schemaxtract_domain::DocumentChunk;
use schemaxtract_extractor::{to_json_pretty, ExtractionMetadata, ResultRow, NOT_FOUND};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of chunk text shown in the chunk preview
const PREVIEW_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format extraction rows.
    pub fn format_rows(&self, rows: &[ResultRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(to_json_pretty(rows)?),
            OutputFormat::Table => Ok(self.format_rows_table(rows)),
            OutputFormat::Quiet => Ok(format_rows_quiet(rows)),
        }
    }

    /// Format extraction rows as a table.
    fn format_rows_table(&self, rows: &[ResultRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Entity Name", "Response"]);

        for row in rows {
            let response = if row.response == NOT_FOUND {
                self.colorize(&row.response, "yellow")
            } else {
                row.response.clone()
            };
            builder.push_record([row.entity_name.clone(), response]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the chunk preview.
    pub fn format_chunks(&self, chunks: &[DocumentChunk]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = chunks
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "index": c.index,
                            "tokens": c.approx_token_count,
                            "start": c.start,
                            "end": c.end,
                            "pages": c.pages.map(|p| p.to_string()),
                            "text": c.text,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                if chunks.is_empty() {
                    return Ok(self.colorize("No text found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Pages", "Tokens", "Preview"]);
                for chunk in chunks {
                    builder.push_record([
                        chunk.index.to_string(),
                        chunk.pages.map(|p| p.to_string()).unwrap_or_default(),
                        chunk.approx_token_count.to_string(),
                        preview(&chunk.text),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(chunks.len().to_string()),
        }
    }

    /// One-line summary of an extraction run.
    pub fn extraction_summary(&self, metadata: &ExtractionMetadata, found: usize, total: usize) -> String {
        self.info(&format!(
            "{}/{} fields found using {} ({} mode, {} chunk(s), {} request(s), {} ms)",
            found,
            total,
            metadata.model_name,
            metadata.mode,
            metadata.chunk_count,
            metadata.requests_completed,
            metadata.processing_time_ms
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Responses only, one per line in schema order.
fn format_rows_quiet(rows: &[ResultRow]) -> String {
    rows.iter()
        .map(|row| row.response.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First characters of a chunk on one line.
fn preview(text: &str) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}
