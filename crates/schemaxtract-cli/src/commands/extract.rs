//! Extract command implementation.

use super::{apply_chunk_overrides, read_pdf};
use crate::cli::ExtractArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use crate::schema_input::load_schema;
use schemaxtract_extractor::{to_json, to_rows, Extractor, PdfTextSource};
use std::fs;
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let schema = load_schema(&args.schema, formatter)?;

    let mut extractor_config = config.extractor.clone();
    if let Some(mode) = args.mode {
        extractor_config.request_mode = mode.into();
    }
    apply_chunk_overrides(&mut extractor_config, args.max_tokens, args.overlap);

    let mut profile = config.get_active_profile()?.clone();
    if let Some(model) = args.model {
        profile.model = model;
    }
    let provider = profile.build_provider()?;

    let bytes = read_pdf(&args.pdf)?;
    info!(
        "Extracting {} field(s) from {} ({} bytes) with {}",
        schema.count(),
        args.pdf.display(),
        bytes.len(),
        profile.model
    );

    let extractor = Extractor::new(provider, extractor_config)?;
    let result = extractor
        .extract_document(&PdfTextSource::new(), &bytes, &schema)
        .await?;

    let rows = to_rows(&schema, &result);
    println!("{}", formatter.format_rows(&rows)?);

    if formatter.format() != OutputFormat::Quiet {
        eprintln!(
            "{}",
            formatter.extraction_summary(&result.metadata, result.found_count(), schema.count())
        );
    }

    if let Some(path) = args.output {
        fs::write(&path, to_json(&rows)?)?;
        if formatter.format() != OutputFormat::Quiet {
            eprintln!("{}", formatter.success(&format!("Saved output to {}", path.display())));
        }
    }

    Ok(())
}
