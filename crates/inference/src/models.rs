use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// One entity span reported by a token-classification model.
///
/// Offsets are character positions within the text that was sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSpan {
    #[serde(alias = "entity", alias = "label")]
    pub entity_group: String,
    #[serde(alias = "text")]
    pub word: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Named-entity recognition.
#[async_trait]
pub trait TokenClassifier: Send + Sync {
    fn model_id(&self) -> &str;

    async fn classify_tokens(&self, text: &str) -> Result<Vec<TokenSpan>, InferenceError>;
}

/// Zero-shot classification against caller-supplied labels.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    fn model_id(&self) -> &str;

    /// Returns every candidate label ranked by descending score.
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        hypothesis_template: &str,
    ) -> Result<Vec<LabelScore>, InferenceError>;
}

/// Abstractive summarization. Lengths are in model tokens, treated as words here.
#[async_trait]
pub trait SummarizationModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, InferenceError>;
}

/// Sort a ranking by descending score, keeping input order among ties.
pub fn rank_labels(mut labels: Vec<LabelScore>) -> Vec<LabelScore> {
    labels.sort_by(|a, b| b.score.total_cmp(&a.score));
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_span_accepts_alternate_field_names() {
        let json = r#"{"label": "ORG", "text": "ABC Corporation", "start": 4, "end": 19}"#;
        let span: TokenSpan = serde_json::from_str(json).unwrap();

        assert_eq!(span.entity_group, "ORG");
        assert_eq!(span.word, "ABC Corporation");
        assert_eq!(span.score, 0.0);
    }

    #[test]
    fn test_rank_labels_descending() {
        let ranked = rank_labels(vec![
            LabelScore { label: "low".into(), score: 0.1 },
            LabelScore { label: "urgent".into(), score: 0.6 },
            LabelScore { label: "high".into(), score: 0.3 },
        ]);

        let order: Vec<&str> = ranked.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(order, vec!["urgent", "high", "low"]);
    }
}
