//! Token-bounded text chunking with overlap
//!
//! Text is first cut into segments on the most semantic boundary that keeps
//! each segment within budget (paragraph, line, sentence, word), falling back
//! to hard cuts on char boundaries. Segments keep their trailing separator, so
//! every chunk is an exact slice of the input. Segments are then merged
//! greedily into chunks, each new chunk starting with the tail of the previous
//! one.

use crate::config::{ExtractorConfig, TokenizerKind};
use crate::error::ExtractorError;
use schemaxtract_domain::{DocumentChunk, PageSpan, PageText};
use std::fmt;
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Separators tried in order, from most to least semantic
const SEPARATORS: &[&[&str]] = &[&["\n\n"], &["\n"], &[". ", "! ", "? "], &[" "]];

/// Separator placed between pages when they are joined
const PAGE_SEPARATOR: &str = "\n\n";

/// Counts tokens the way the target model does (or close to it)
pub enum Tokenizer {
    /// tiktoken `cl100k_base`
    Cl100k(CoreBPE),
    /// 4 characters per token, rounded up
    Approximate,
}

impl Tokenizer {
    /// Load the tokenizer for `kind`
    pub fn new(kind: TokenizerKind) -> Result<Self, ExtractorError> {
        match kind {
            TokenizerKind::Cl100k => tiktoken_rs::cl100k_base()
                .map(Tokenizer::Cl100k)
                .map_err(|e| ExtractorError::Config(format!("Failed to load cl100k tokenizer: {}", e))),
            TokenizerKind::Approximate => Ok(Tokenizer::Approximate),
        }
    }

    /// Number of tokens in `text`
    pub fn count(&self, text: &str) -> usize {
        match self {
            Tokenizer::Cl100k(bpe) => bpe.encode_ordinary(text).len(),
            Tokenizer::Approximate => text.chars().count().div_ceil(4),
        }
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tokenizer::Cl100k(_) => f.write_str("Tokenizer::Cl100k"),
            Tokenizer::Approximate => f.write_str("Tokenizer::Approximate"),
        }
    }
}

/// A contiguous piece of the input that fits the budget on its own
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: usize,
    end: usize,
    tokens: usize,
}

/// Chunk as a range of segments plus its measured size
#[derive(Debug, Clone, Copy)]
struct Span {
    first: usize,
    end: usize,
    tokens: usize,
}

/// Splits text into overlapping, token-bounded chunks
#[derive(Debug)]
pub struct TextChunker {
    tokenizer: Tokenizer,
    max_tokens: usize,
    overlap_tokens: usize,
}

impl TextChunker {
    /// Create a new text chunker
    ///
    /// # Errors
    /// Returns error unless `0 < max_tokens` and `overlap_tokens < max_tokens`
    pub fn new(tokenizer: Tokenizer, max_tokens: usize, overlap_tokens: usize) -> Result<Self, ExtractorError> {
        if max_tokens == 0 {
            return Err(ExtractorError::Config("max_tokens must be greater than 0".to_string()));
        }
        if overlap_tokens >= max_tokens {
            return Err(ExtractorError::Config(format!(
                "overlap_tokens ({}) must be smaller than max_tokens ({})",
                overlap_tokens, max_tokens
            )));
        }
        Ok(Self {
            tokenizer,
            max_tokens,
            overlap_tokens,
        })
    }

    /// Create a chunker from extractor settings
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::new(
            Tokenizer::new(config.tokenizer)?,
            config.max_chunk_tokens,
            config.chunk_overlap_tokens,
        )
    }

    /// Tokenizer used for budgets
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Maximum tokens per chunk
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Target overlap between consecutive chunks
    pub fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }

    /// Split text into chunks
    ///
    /// Empty or whitespace-only text yields no chunks. Text within budget
    /// yields exactly one chunk.
    pub fn split(&self, text: &str) -> Vec<DocumentChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut segments = Vec::new();
        self.segment(text, 0, 0, &mut segments);
        let spans = self.merge(text, &segments);

        debug!(
            "Split {} bytes into {} segments and {} chunks",
            text.len(),
            segments.len(),
            spans.len()
        );

        spans
            .iter()
            .enumerate()
            .map(|(index, span)| {
                let start = segments[span.first].start;
                let end = segments[span.end - 1].end;
                DocumentChunk {
                    text: text[start..end].to_string(),
                    index,
                    approx_token_count: span.tokens,
                    start,
                    end,
                    pages: None,
                }
            })
            .collect()
    }

    /// Split page text, annotating each chunk with the pages it covers
    ///
    /// Pages are joined with a blank line; chunk offsets refer to the joined text.
    pub fn split_pages(&self, pages: &[PageText]) -> Vec<DocumentChunk> {
        let mut joined = String::new();
        let mut page_starts = Vec::with_capacity(pages.len());

        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                joined.push_str(PAGE_SEPARATOR);
            }
            page_starts.push((joined.len(), page.page_number));
            joined.push_str(&page.text);
        }

        let page_at = |offset: usize| -> Option<u32> {
            let idx = page_starts.partition_point(|(start, _)| *start <= offset);
            idx.checked_sub(1).map(|i| page_starts[i].1)
        };

        let mut chunks = self.split(&joined);
        for chunk in &mut chunks {
            if let (Some(first), Some(last)) = (page_at(chunk.start), page_at(chunk.end.saturating_sub(1))) {
                chunk.pages = Some(PageSpan { first, last });
            }
        }
        chunks
    }

    /// Recursively cut `text` into in-budget segments
    fn segment(&self, text: &str, offset: usize, level: usize, out: &mut Vec<Segment>) {
        let tokens = self.tokenizer.count(text);
        if tokens <= self.max_tokens {
            out.push(Segment {
                start: offset,
                end: offset + text.len(),
                tokens,
            });
            return;
        }

        match SEPARATORS.get(level) {
            Some(separators) => {
                for (start, end) in split_keeping_separators(text, separators) {
                    self.segment(&text[start..end], offset + start, level + 1, out);
                }
            }
            None => self.hard_cut(text, offset, out),
        }
    }

    /// Cut text with no usable separator at the largest in-budget char prefix
    fn hard_cut(&self, text: &str, offset: usize, out: &mut Vec<Segment>) {
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut from = 0;
        let mut lo = 0;
        while lo < bounds.len() {
            let fits = |k: usize| self.tokenizer.count(&text[from..bounds[k]]) <= self.max_tokens;

            // Grow the search window until it overshoots the budget
            let mut window = self.max_tokens.saturating_mul(8).max(1);
            let hi = loop {
                let hi = lo.saturating_add(window).min(bounds.len());
                if hi == bounds.len() || !fits(hi - 1) {
                    break hi;
                }
                window = window.saturating_mul(2);
            };

            // Largest k in [lo, hi) that fits; a single char is always taken
            let (mut left, mut right) = (lo, hi);
            while left < right {
                let mid = left + (right - left) / 2;
                if fits(mid) {
                    left = mid + 1;
                } else {
                    right = mid;
                }
            }
            let k = if left > lo { left - 1 } else { lo };

            let end = bounds[k];
            out.push(Segment {
                start: offset + from,
                end: offset + end,
                tokens: self.tokenizer.count(&text[from..end]),
            });
            from = end;
            lo = k + 1;
        }
    }

    /// Greedily merge segments into overlapping chunks
    fn merge(&self, text: &str, segments: &[Segment]) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut first = 0;
        let mut end = 0;
        let mut tokens = 0;

        while first < segments.len() {
            if end < segments.len() {
                let next = segments[end].tokens;
                if end == first || tokens + next <= self.max_tokens {
                    tokens += next;
                    end += 1;
                    continue;
                }
            }

            let span = self.close(text, segments, first, end);
            end = span.end;
            spans.push(span);
            if end == segments.len() {
                break;
            }

            first = self.overlap_start(segments, first, end);
            tokens = segments[first..end].iter().map(|s| s.tokens).sum();
        }

        spans
    }

    /// Measure the window for real, dropping trailing segments while it overshoots
    fn close(&self, text: &str, segments: &[Segment], first: usize, mut end: usize) -> Span {
        loop {
            let slice = &text[segments[first].start..segments[end - 1].end];
            let tokens = self.tokenizer.count(slice);
            if tokens <= self.max_tokens || end - first == 1 {
                return Span { first, end, tokens };
            }
            end -= 1;
        }
    }

    /// First segment of the next window: the longest tail of the closed window
    /// within the overlap budget that still leaves room for the next segment
    fn overlap_start(&self, segments: &[Segment], first: usize, end: usize) -> usize {
        let next = segments.get(end).map_or(0, |s| s.tokens);
        let mut start = end;
        let mut carried = 0;

        while start > first {
            let tokens = segments[start - 1].tokens;
            if carried + tokens > self.overlap_tokens || carried + tokens + next > self.max_tokens {
                break;
            }
            carried += tokens;
            start -= 1;
        }

        // Carrying the whole window would repeat it; start fresh instead
        if start == first {
            end
        } else {
            start
        }
    }
}

/// Split on any of `separators`, keeping each separator at the end of its piece
fn split_keeping_separators(text: &str, separators: &[&str]) -> Vec<(usize, usize)> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let next = separators
            .iter()
            .filter_map(|sep| text[start..].find(sep).map(|i| start + i + sep.len()))
            .min();

        match next {
            Some(end) => {
                pieces.push((start, end));
                start = end;
            }
            None => break,
        }
    }

    if start < text.len() {
        pieces.push((start, text.len()));
    }
    pieces
}
