//! PDF text extraction

use crate::error::ExtractorError;
use schemaxtract_domain::traits::TextSource;
use schemaxtract_domain::PageText;
use tracing::debug;

/// Extracts per-page text from PDF bytes with `pdf-extract`
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    /// Create a new PDF text source
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PdfTextSource {
    type Error = ExtractorError;

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, Self::Error> {
        if bytes.is_empty() {
            return Err(ExtractorError::Source("PDF file is empty".to_string()));
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractorError::Source(format!("PDF extraction failed: {}", e)))?;

        debug!("Extracted {} pages", pages.len());

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i as u32 + 1, text))
            .collect())
    }
}
