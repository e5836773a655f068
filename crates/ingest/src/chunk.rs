use serde::Serialize;

/// A fixed-size character slice of a document, used for models with an input limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextWindow {
    pub index: usize,
    pub text: String,
    pub offset: (usize, usize), // [start, end) character positions in the source text
}

impl TextWindow {
    pub fn char_len(&self) -> usize {
        self.offset.1 - self.offset.0
    }
}

/// A run of whole sentences whose combined word count fits a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceChunk {
    pub sentences: Vec<String>,
    pub word_count: usize,
}

impl SentenceChunk {
    pub(crate) fn new() -> Self {
        Self {
            sentences: Vec::new(),
            word_count: 0,
        }
    }

    pub(crate) fn push(&mut self, sentence: String, words: usize) {
        self.sentences.push(sentence);
        self.word_count += words;
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentences joined with single spaces.
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}
