//! Chunks command implementation.

use super::{apply_chunk_overrides, read_pdf};
use crate::cli::ChunksArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use schemaxtract_domain::traits::TextSource;
use schemaxtract_extractor::{PdfTextSource, TextChunker};
use tracing::info;

/// Execute the chunks command.
pub async fn execute_chunks(args: ChunksArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut extractor_config = config.extractor.clone();
    apply_chunk_overrides(&mut extractor_config, args.max_tokens, args.overlap);
    let chunker = TextChunker::from_config(&extractor_config)?;

    let bytes = read_pdf(&args.pdf)?;
    let pages = PdfTextSource::new().extract_pages(&bytes)?;
    let chunks = chunker.split_pages(&pages);

    info!(
        "{} page(s) split into {} chunk(s) of at most {} tokens",
        pages.len(),
        chunks.len(),
        chunker.max_tokens()
    );

    println!("{}", formatter.format_chunks(&chunks)?);
    Ok(())
}
