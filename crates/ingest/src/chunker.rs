use unicode_segmentation::UnicodeSegmentation;

use crate::chunk::{SentenceChunk, TextWindow};

pub struct ChunkerConfig {
    /// Word budget per chunk. Words are whitespace-delimited tokens.
    pub max_words: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { max_words: 1024 }
    }
}

/// Groups whole sentences into chunks that stay within a word budget.
pub struct SentenceChunker {
    config: ChunkerConfig,
}

impl SentenceChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn max_words(&self) -> usize {
        self.config.max_words
    }

    /// Accumulate sentences until the next one would exceed the budget, then
    /// start a new chunk. A sentence longer than the budget becomes a chunk
    /// of its own; sentences are never split.
    pub fn chunk_text(&self, text: &str) -> Vec<SentenceChunk> {
        let mut chunks = Vec::new();
        let mut current = SentenceChunk::new();

        for sentence in split_sentences(text) {
            let words = count_words(&sentence);

            if current.word_count + words > self.config.max_words && !current.is_empty() {
                chunks.push(std::mem::replace(&mut current, SentenceChunk::new()));
            }

            current.push(sentence, words);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

/// Unicode sentence segmentation with surrounding whitespace trimmed.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into consecutive windows of at most `window_chars` characters.
/// Offsets are counted in chars, not bytes.
pub fn char_windows(text: &str, window_chars: usize) -> Vec<TextWindow> {
    let window_chars = window_chars.max(1);
    let mut windows = Vec::new();

    let mut start_char = 0;
    let mut start_byte = 0;
    let mut count = 0;

    for (byte_idx, _) in text.char_indices() {
        if count == window_chars {
            windows.push(TextWindow {
                index: windows.len(),
                text: text[start_byte..byte_idx].to_string(),
                offset: (start_char, start_char + count),
            });
            start_char += count;
            start_byte = byte_idx;
            count = 0;
        }
        count += 1;
    }

    if count > 0 {
        windows.push(TextWindow {
            index: windows.len(),
            text: text[start_byte..].to_string(),
            offset: (start_char, start_char + count),
        });
    }

    windows
}
