use serde::{Deserialize, Serialize};

/// Below this many words a text is summarized with bounds derived from its length.
pub const SHORT_TEXT_WORDS: usize = 100;

/// Above this many words a text is chunked before summarizing.
pub const LONG_TEXT_WORDS: usize = 1024;

/// Target summary length in words, passed to the model as max/min length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 40,
        }
    }
}

impl SummaryBounds {
    pub fn new(max_length: usize, min_length: usize) -> Self {
        Self {
            max_length,
            min_length,
        }
    }

    /// Bounds for a text of `words` words under [`SHORT_TEXT_WORDS`].
    pub fn for_short_text(words: usize) -> Self {
        Self {
            max_length: words.min(60),
            min_length: (words / 2).min(20),
        }
    }

    /// Bounds for one chunk of a long document.
    pub fn for_chunk(words: usize) -> Self {
        Self {
            max_length: (words / 4).clamp(30, 100),
            min_length: (words / 8).min(20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRegime {
    Short,
    Medium,
    Long,
}

impl LengthRegime {
    pub fn classify(words: usize) -> Self {
        if words < SHORT_TEXT_WORDS {
            LengthRegime::Short
        } else if words <= LONG_TEXT_WORDS {
            LengthRegime::Medium
        } else {
            LengthRegime::Long
        }
    }
}
