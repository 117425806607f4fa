//! Core Extractor implementation

use crate::chunking::TextChunker;
use crate::config::{ExtractorConfig, RequestMode};
use crate::contract::FormatContract;
use crate::error::ExtractorError;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionResult, FieldValue, FieldValues};
use futures::stream::{self, StreamExt};
use schemaxtract_domain::document::join_chunks;
use schemaxtract_domain::traits::{LlmProvider, TextSource};
use schemaxtract_domain::{DocumentChunk, SchemaSet};
use std::collections::hash_map::Entry;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The Extractor turns document text into one answer per schema field
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    chunker: TextChunker,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Extractor
    ///
    /// # Errors
    /// Returns `ExtractorError::Config` if the configuration is invalid or
    /// the tokenizer cannot be loaded
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let chunker = TextChunker::from_config(&config)?;

        Ok(Self {
            llm_provider,
            chunker,
            config,
        })
    }

    /// Chunker built from the configuration
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run the whole pipeline on a document: validate the schema, extract
    /// page text, chunk it and query the model
    pub async fn extract_document<S>(
        &self,
        source: &S,
        bytes: &[u8],
        schema: &SchemaSet,
    ) -> Result<ExtractionResult, ExtractorError>
    where
        S: TextSource,
        S::Error: Into<ExtractorError>,
    {
        schema.ensure_ready().map_err(ExtractorError::Validation)?;

        let pages = source.extract_pages(bytes).map_err(Into::into)?;
        info!("Extracted text from {} pages", pages.len());

        let chunks = self.chunker.split_pages(&pages);
        let contract = FormatContract::build(schema);

        self.run(&chunks, &contract).await
    }

    /// Query the model over `chunks` and parse the answers with `contract`
    ///
    /// # Errors
    /// - `ExtractorError::Validation` if the contract has no fields
    /// - `ExtractorError::Source` if there is no document text
    /// - `ExtractorError::Llm` on any provider failure (not retried)
    /// - `ExtractorError::Parse` if no answer could be parsed
    pub async fn run(
        &self,
        chunks: &[DocumentChunk],
        contract: &FormatContract,
    ) -> Result<ExtractionResult, ExtractorError> {
        if contract.fields().is_empty() {
            return Err(ExtractorError::Validation(
                "At least one schema field is required".to_string(),
            ));
        }
        if chunks.is_empty() {
            return Err(ExtractorError::Source(
                "Document contains no extractable text".to_string(),
            ));
        }

        let start_time = Instant::now();
        let mode = self.resolve_mode(chunks, contract);

        info!(
            "Starting extraction: {} chunks, {} fields, {} mode",
            chunks.len(),
            contract.fields().len(),
            mode
        );

        let (values, requests_completed) = match mode {
            RequestMode::PerChunk => self.run_per_chunk(chunks, contract).await?,
            _ => self.run_single(chunks, contract).await?,
        };

        let metadata = ExtractionMetadata {
            model_name: self.llm_provider.model_name().to_string(),
            mode,
            chunk_count: chunks.len(),
            requests_completed,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        let result = ExtractionResult { values, metadata };
        info!(
            "Extraction complete: {} of {} fields found",
            result.found_count(),
            contract.fields().len()
        );

        Ok(result)
    }

    /// Request mode to use for this document (never `Auto`)
    pub fn resolve_mode(&self, chunks: &[DocumentChunk], contract: &FormatContract) -> RequestMode {
        match self.config.request_mode {
            RequestMode::Auto => {
                if chunks.len() <= 1 {
                    return RequestMode::Single;
                }

                // Chunk counts include overlaps, so this overestimates
                let overhead = self
                    .chunker
                    .tokenizer()
                    .count(&PromptBuilder::overhead(contract));
                let document: usize = chunks.iter().map(|c| c.approx_token_count).sum();
                debug!(
                    "Prompt estimate: {} tokens (budget {})",
                    overhead + document,
                    self.config.max_prompt_tokens
                );

                if overhead + document <= self.config.max_prompt_tokens {
                    RequestMode::Single
                } else {
                    RequestMode::PerChunk
                }
            }
            mode => mode,
        }
    }

    /// One request with the whole document
    async fn run_single(
        &self,
        chunks: &[DocumentChunk],
        contract: &FormatContract,
    ) -> Result<(FieldValues, usize), ExtractorError> {
        let document = join_chunks(chunks);
        let prompt = PromptBuilder::new(contract).with_document(&document).build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = self.call_llm(&prompt).await?;
        debug!("LLM response length: {} chars", response.len());

        let values = contract.parse(&response)?;
        Ok((values, 1))
    }

    /// One request per chunk, first found answer per field wins
    async fn run_per_chunk(
        &self,
        chunks: &[DocumentChunk],
        contract: &FormatContract,
    ) -> Result<(FieldValues, usize), ExtractorError> {
        // `buffered` yields in chunk order regardless of completion order
        let mut responses = stream::iter(chunks.iter().map(|chunk| self.complete_chunk(chunk, contract)))
            .buffered(self.config.concurrency);

        let mut merged = FieldValues::new();
        let mut completed = 0;
        let mut parsed_any = false;
        let mut last_error = None;

        while let Some((index, response)) = responses.next().await {
            let response = response?;
            completed += 1;

            match contract.parse(&response) {
                Ok(values) => {
                    parsed_any = true;
                    merge_first_found(&mut merged, values);
                }
                Err(e) => {
                    warn!("Chunk {} answer could not be parsed: {}", index, e);
                    last_error = Some(e);
                }
            }

            let all_found = contract
                .fields()
                .iter()
                .all(|f| merged.get(f.name()).is_some_and(FieldValue::is_found));
            if all_found {
                debug!("All fields found after chunk {}, skipping the rest", index);
                break;
            }
        }

        if !parsed_any {
            return Err(last_error.unwrap_or_else(|| {
                ExtractorError::Parse("no chunk produced an answer".to_string())
            }));
        }

        for field in contract.fields() {
            merged
                .entry(field.name().to_string())
                .or_insert(FieldValue::NotFound);
        }

        Ok((merged, completed))
    }

    async fn complete_chunk(
        &self,
        chunk: &DocumentChunk,
        contract: &FormatContract,
    ) -> (usize, Result<String, ExtractorError>) {
        let prompt = PromptBuilder::new(contract).with_document(&chunk.text).build();
        debug!(
            "Requesting chunk {} ({} tokens)",
            chunk.index, chunk.approx_token_count
        );
        (chunk.index, self.call_llm(&prompt).await)
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: &str) -> Result<String, ExtractorError> {
        self.llm_provider
            .complete(prompt)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    }
}

/// Keep earlier answers; later chunks only fill fields still missing
fn merge_first_found(merged: &mut FieldValues, values: FieldValues) {
    for (name, value) in values {
        match merged.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                if !entry.get().is_found() && value.is_found() {
                    entry.insert(value);
                }
            }
        }
    }
}
