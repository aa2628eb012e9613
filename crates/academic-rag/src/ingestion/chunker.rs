//! Overlapping word-window chunking

use crate::config::ChunkingConfig;
use crate::error::Result;

/// Splits text into windows of `chunk_size` words, each sharing `overlap`
/// words with the previous window
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    chunk_size: usize,
    overlap: usize,
}

impl WordChunker {
    /// Create a new chunker. Fails if `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        ChunkingConfig {
            chunk_size,
            overlap,
        }
        .validate()?;
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between consecutive window starts
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Lazily produce chunks of `text`. Calling again restarts from the beginning.
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            words: text.split_whitespace().collect(),
            start: 0,
            chunk_size: self.chunk_size,
            step: self.step(),
        }
    }

    /// Collect all chunks of `text`
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunks(text).collect()
    }

    /// Number of chunks `chunk` would produce for `word_count` words
    pub fn expected_chunks(&self, word_count: usize) -> usize {
        word_count.div_ceil(self.step())
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        let config = ChunkingConfig::default();
        Self {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
        }
    }
}

/// Iterator over word windows, see [`WordChunker::chunks`]
pub struct Chunks<'a> {
    words: Vec<&'a str>,
    start: usize,
    chunk_size: usize,
    step: usize,
}

impl Iterator for Chunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.start < self.words.len() {
            let end = self.start.saturating_add(self.chunk_size).min(self.words.len());
            let window = self.words[self.start..end].join(" ");
            self.start = self.start.saturating_add(self.step);
            if !window.trim().is_empty() {
                return Some(window);
            }
        }
        None
    }
}

/// Chunk `text` without keeping a chunker around
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(WordChunker::new(chunk_size, overlap)?.chunk(text))
}
