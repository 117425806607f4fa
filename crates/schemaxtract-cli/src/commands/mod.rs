//! Command implementations.

pub mod chunks;
pub mod extract;
pub mod instructions;
pub mod profile;

pub use self::chunks::execute_chunks;
pub use self::extract::execute_extract;
pub use self::instructions::execute_instructions;
pub use self::profile::execute_profile;

use crate::error::{CliError, Result};
use schemaxtract_extractor::ExtractorConfig;
use std::fs;
use std::path::Path;

/// Apply `--max-tokens`/`--overlap` to the configured chunk budget.
///
/// When only the chunk size is given and the configured overlap no longer
/// fits, the overlap drops to a tenth of the chunk size.
pub(crate) fn apply_chunk_overrides(
    config: &mut ExtractorConfig,
    max_tokens: Option<usize>,
    overlap: Option<usize>,
) {
    if let Some(max_tokens) = max_tokens {
        config.max_chunk_tokens = max_tokens;
        if overlap.is_none() && config.chunk_overlap_tokens >= max_tokens {
            config.chunk_overlap_tokens = max_tokens / 10;
        }
        if config.max_prompt_tokens <= max_tokens {
            config.max_prompt_tokens = max_tokens.saturating_mul(10);
        }
    }
    if let Some(overlap) = overlap {
        config.chunk_overlap_tokens = overlap;
    }
}

/// Read a PDF from disk, naming the file on failure.
pub(crate) fn read_pdf(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_keep_config_valid() {
        let mut config = ExtractorConfig::default();
        apply_chunk_overrides(&mut config, Some(500), None);

        assert_eq!(config.max_chunk_tokens, 500);
        assert_eq!(config.chunk_overlap_tokens, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_large_chunk_raises_prompt_budget() {
        let mut config = ExtractorConfig::default();
        apply_chunk_overrides(&mut config, Some(200_000), None);

        assert_eq!(config.chunk_overlap_tokens, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_overlap_wins() {
        let mut config = ExtractorConfig::default();
        apply_chunk_overrides(&mut config, Some(500), Some(499));
        assert_eq!(config.chunk_overlap_tokens, 499);

        apply_chunk_overrides(&mut config, None, Some(600));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_pdf_names_file() {
        let err = read_pdf(Path::new("/nonexistent/invoice.pdf")).unwrap_err();
        assert!(err.to_string().contains("invoice.pdf"));
    }
}
