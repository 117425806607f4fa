//! Document text as produced by a text source and consumed by the chunker

use std::fmt;

/// Text of one document page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number
    pub page_number: u32,

    /// Extracted text of the page
    pub text: String,
}

impl PageText {
    /// Create a new page
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// Inclusive range of pages a chunk was cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    /// First page touched by the chunk
    pub first: u32,

    /// Last page touched by the chunk
    pub last: u32,
}

impl fmt::Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// A bounded slice of document text
///
/// `start` and `end` are byte offsets into the text the chunk was cut from,
/// so `text == source[start..end]`. Consecutive chunks may overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    /// Chunk text
    pub text: String,

    /// Position in the chunk sequence (0-based)
    pub index: usize,

    /// Token count as measured by the chunker's tokenizer
    pub approx_token_count: usize,

    /// Byte offset where the chunk starts in the source text
    pub start: usize,

    /// Byte offset where the chunk ends in the source text (exclusive)
    pub end: usize,

    /// Pages covered, when the source text came from pages
    pub pages: Option<PageSpan>,
}

impl DocumentChunk {
    /// Number of leading bytes shared with the previous chunk
    pub fn overlap_with(&self, previous: &DocumentChunk) -> usize {
        previous.end.saturating_sub(self.start).min(self.text.len())
    }
}

/// Rebuild the text covered by a chunk sequence, dropping overlapped regions
///
/// # Examples
///
/// ```
/// use schemaxtract_domain::{document::join_chunks, DocumentChunk};
///
/// let chunks = vec![
///     DocumentChunk { text: "one two ".into(), index: 0, approx_token_count: 2, start: 0, end: 8, pages: None },
///     DocumentChunk { text: "two three".into(), index: 1, approx_token_count: 2, start: 4, end: 13, pages: None },
/// ];
/// assert_eq!(join_chunks(&chunks), "one two three");
/// ```
pub fn join_chunks(chunks: &[DocumentChunk]) -> String {
    let mut joined = String::new();
    let mut previous: Option<&DocumentChunk> = None;

    for chunk in chunks {
        let skip = previous.map_or(0, |p| chunk.overlap_with(p));
        // Offsets come from char-boundary cuts; fall back to the whole chunk otherwise
        match chunk.text.get(skip..) {
            Some(tail) => joined.push_str(tail),
            None => joined.push_str(&chunk.text),
        }
        previous = Some(chunk);
    }

    joined
}
