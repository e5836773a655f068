pub mod bounds;

pub use bounds::{LengthRegime, SummaryBounds, LONG_TEXT_WORDS, SHORT_TEXT_WORDS};

use ingest::{count_words, SentenceChunker};
use inference::{InferenceError, SummarizationModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Chunks shorter than this are skipped on the long-text path.
pub const MIN_CHUNK_WORDS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_ratio: f64,
}

impl SummaryResult {
    fn new(summary: String, original_length: usize) -> Self {
        let summary_length = count_words(&summary);

        Self {
            summary,
            original_length,
            summary_length,
            compression_ratio: summary_length as f64 / original_length.max(1) as f64,
        }
    }
}

/// Summarize `text`, chunking and recombining when it is too long for one call.
///
/// Short texts ignore `bounds` and use [`SummaryBounds::for_short_text`].
/// Long texts are split into sentence-bounded chunks; each chunk of at least
/// [`MIN_CHUNK_WORDS`] words is summarized on its own, and the joined chunk
/// summaries get one more pass if they exceed 1.5 times `bounds.max_length`.
pub async fn summarize_with(
    model: &dyn SummarizationModel,
    text: &str,
    bounds: SummaryBounds,
    chunker: &SentenceChunker,
) -> Result<SummaryResult, InferenceError> {
    let original_length = count_words(text);

    if original_length == 0 {
        return Ok(SummaryResult::new(String::new(), 0));
    }

    let summary = match LengthRegime::classify(original_length) {
        LengthRegime::Short => {
            let short = SummaryBounds::for_short_text(original_length);
            model.summarize(text, short.max_length, short.min_length).await?
        }
        LengthRegime::Medium => model.summarize(text, bounds.max_length, bounds.min_length).await?,
        LengthRegime::Long => summarize_long(model, text, bounds, chunker).await?,
    };

    Ok(SummaryResult::new(summary, original_length))
}

async fn summarize_long(
    model: &dyn SummarizationModel,
    text: &str,
    bounds: SummaryBounds,
    chunker: &SentenceChunker,
) -> Result<String, InferenceError> {
    let chunks = chunker.chunk_text(text);
    let total_chunks = chunks.len();

    let mut partials = Vec::new();
    for chunk in chunks.iter().filter(|c| c.word_count >= MIN_CHUNK_WORDS) {
        let chunk_bounds = SummaryBounds::for_chunk(chunk.word_count);
        let partial = model
            .summarize(&chunk.text(), chunk_bounds.max_length, chunk_bounds.min_length)
            .await?;
        partials.push(partial);
    }

    tracing::debug!(
        total_chunks,
        summarized_chunks = partials.len(),
        "Summarized document chunks"
    );

    let combined = partials.join(" ");

    if count_words(&combined) as f64 > 1.5 * bounds.max_length as f64 {
        model.summarize(&combined, bounds.max_length, bounds.min_length).await
    } else {
        Ok(combined)
    }
}

pub struct DocumentSummarizer {
    model: Arc<dyn SummarizationModel>,
    chunker: SentenceChunker,
    default_bounds: SummaryBounds,
}

impl DocumentSummarizer {
    pub fn new(model: Arc<dyn SummarizationModel>) -> Self {
        Self {
            model,
            chunker: SentenceChunker::default(),
            default_bounds: SummaryBounds::default(),
        }
    }

    pub fn with_chunker(mut self, chunker: SentenceChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_default_bounds(mut self, bounds: SummaryBounds) -> Self {
        self.default_bounds = bounds;
        self
    }

    pub fn default_bounds(&self) -> SummaryBounds {
        self.default_bounds
    }

    pub async fn generate_summary(
        &self,
        text: &str,
        bounds: Option<SummaryBounds>,
    ) -> Result<SummaryResult, InferenceError> {
        let bounds = bounds.unwrap_or(self.default_bounds);
        let result = summarize_with(self.model.as_ref(), text, bounds, &self.chunker).await?;

        tracing::info!(
            model = self.model.model_id(),
            original_length = result.original_length,
            summary_length = result.summary_length,
            "Summary generated"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        input_words: usize,
        max_length: usize,
        min_length: usize,
    }

    /// Keeps the first `max_length` words of its input.
    #[derive(Default)]
    struct LeadWords {
        calls: Mutex<Vec<Call>>,
    }

    impl LeadWords {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SummarizationModel for LeadWords {
        fn model_id(&self) -> &str {
            "lead-words"
        }

        async fn summarize(
            &self,
            text: &str,
            max_length: usize,
            min_length: usize,
        ) -> Result<String, InferenceError> {
            self.calls.lock().unwrap().push(Call {
                input_words: count_words(text),
                max_length,
                min_length,
            });
            Ok(text.split_whitespace().take(max_length).collect::<Vec<_>>().join(" "))
        }
    }

    struct Unavailable;

    #[async_trait]
    impl SummarizationModel for Unavailable {
        fn model_id(&self) -> &str {
            "unavailable"
        }

        async fn summarize(&self, _text: &str, _max: usize, _min: usize) -> Result<String, InferenceError> {
            Err(InferenceError::Status {
                model: "unavailable".to_string(),
                status: 503,
                body: "loading".to_string(),
            })
        }
    }

    /// `count` ten-word sentences.
    fn sentences(count: usize) -> String {
        (0..count)
            .map(|i| format!("Sentence number {} has exactly ten words in it today.", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn test_empty_text_skips_model() {
        let model = LeadWords::default();

        let result = summarize_with(&model, "  \n ", SummaryBounds::default(), &SentenceChunker::default())
            .await
            .unwrap();

        assert_eq!(result.summary, "");
        assert_eq!(result.original_length, 0);
        assert_eq!(result.compression_ratio, 0.0);
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_text_uses_derived_bounds() {
        let model = LeadWords::default();

        let result = summarize_with(&model, &sentences(3), SummaryBounds::default(), &SentenceChunker::default())
            .await
            .unwrap();

        assert_eq!(
            model.calls(),
            vec![Call {
                input_words: 30,
                max_length: 30,
                min_length: 15
            }]
        );
        assert_eq!(result.original_length, 30);
    }

    #[tokio::test]
    async fn test_medium_text_is_shorter_than_original() {
        let model = LeadWords::default();

        let result = summarize_with(&model, &sentences(50), SummaryBounds::default(), &SentenceChunker::default())
            .await
            .unwrap();

        assert_eq!(model.calls().len(), 1);
        assert_eq!(model.calls()[0].max_length, 150);
        assert_eq!(model.calls()[0].min_length, 40);
        assert_eq!(result.original_length, 500);
        assert_eq!(result.summary_length, 150);
        assert!(result.summary_length < result.original_length);
        assert!((result.compression_ratio - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_long_text_summarizes_each_chunk() {
        let model = LeadWords::default();

        let result = summarize_with(&model, &sentences(150), SummaryBounds::default(), &SentenceChunker::default())
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].input_words, 1020);
        assert_eq!(calls[1].input_words, 480);
        assert!(calls.iter().all(|c| c.max_length == 100 && c.min_length == 20));

        // 200 joined words stay under 1.5 * 150, so no final pass
        assert_eq!(result.summary_length, 200);
        assert!(result.summary.starts_with("Sentence number 0 "));
    }

    #[tokio::test]
    async fn test_long_join_gets_final_pass() {
        let model = LeadWords::default();

        let result = summarize_with(&model, &sentences(150), SummaryBounds::new(100, 30), &SentenceChunker::default())
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[2],
            Call {
                input_words: 200,
                max_length: 100,
                min_length: 30
            }
        );
        assert_eq!(result.summary_length, 100);
    }

    #[tokio::test]
    async fn test_small_trailing_chunk_is_dropped() {
        let model = LeadWords::default();

        let result = summarize_with(&model, &sentences(105), SummaryBounds::default(), &SentenceChunker::default())
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input_words, 1020);
        assert_eq!(result.original_length, 1050);
    }

    #[tokio::test]
    async fn test_model_failure_aborts() {
        let summarizer = DocumentSummarizer::new(Arc::new(Unavailable));

        let err = summarizer.generate_summary(&sentences(20), None).await.unwrap_err();
        assert!(matches!(err, InferenceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_generate_summary_uses_default_bounds() {
        let model = Arc::new(LeadWords::default());
        let summarizer = DocumentSummarizer::new(model.clone()).with_default_bounds(SummaryBounds::new(80, 10));

        summarizer.generate_summary(&sentences(20), None).await.unwrap();
        summarizer
            .generate_summary(&sentences(20), Some(SummaryBounds::new(50, 5)))
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!((calls[0].max_length, calls[0].min_length), (80, 10));
        assert_eq!((calls[1].max_length, calls[1].min_length), (50, 5));
    }

    #[test]
    fn test_summary_json_shape() {
        let json = serde_json::to_value(SummaryResult::new("one two".to_string(), 8)).unwrap();

        assert_eq!(json["summary"], "one two");
        assert_eq!(json["original_length"], 8);
        assert_eq!(json["summary_length"], 2);
        assert_eq!(json["compression_ratio"], 0.25);
    }
}
