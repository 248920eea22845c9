//! Paragraph-aware chunking with trailing-context overlap.
//!
//! Long documents are rewritten chunk by chunk. Each chunk after the first opens
//! with the last few words of its predecessor so the rewrite keeps continuity.
//! Paragraphs are never split: one larger than the budget becomes a chunk of
//! its own.

mod helpers;

pub use helpers::{count_words, overlap_text};

use poltertext_core::document::paragraphs;

/// Chunk budget and overlap, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum words per chunk (default: 800).
    pub max_words: usize,
    /// Words carried from the end of one chunk into the next (default: 100).
    pub overlap_words: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_words: 800,
            overlap_words: 100,
        }
    }
}

/// Split `text` into ordered chunks.
///
/// Empty input (no paragraphs) yields the original text as the single chunk.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut buffer_words = 0usize;

    for para in paragraphs(text) {
        let para_words = count_words(&para);

        if !buffer.is_empty() && buffer_words + para_words > config.max_words {
            let flushed = buffer.join("\n\n");
            buffer.clear();
            buffer_words = 0;

            if config.overlap_words > 0 {
                let seed = overlap_text(&flushed, config.overlap_words);
                buffer_words = count_words(&seed);
                buffer.push(seed);
            }
            chunks.push(flushed);
        }

        buffer_words += para_words;
        buffer.push(para);
    }

    if !buffer.is_empty() {
        chunks.push(buffer.join("\n\n"));
    }

    if chunks.is_empty() {
        return vec![text.to_string()];
    }
    chunks
}
