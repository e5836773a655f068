pub mod labels;
pub mod urgency;

pub use labels::{DOCUMENT_TYPES, PRIORITY_LEVELS};
pub use urgency::{escalate_priority, UrgencySignals, URGENCY_TERMS};

use inference::{rank_labels, InferenceError, LabelScore, ZeroShotClassifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeScore {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub priority: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeClassification {
    pub document_type: String,
    pub confidence: f64,
    pub all_types: Vec<TypeScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub priority: String,
    /// Score of the model's top label, which may differ from `priority`
    /// after keyword escalation.
    pub confidence: f64,
    pub contains_explicit_urgency: bool,
    pub contains_deadline: bool,
    pub all_priorities: Vec<PriorityScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub document_type: String,
    pub type_confidence: f64,
    pub all_types: Vec<TypeScore>,
    pub priority: String,
    pub priority_confidence: f64,
    pub urgency_indicators: UrgencySignals,
}

/// First `max_tokens` whitespace-delimited tokens, joined by single spaces.
pub fn sample_tokens(text: &str, max_tokens: usize) -> String {
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Document type and priority via zero-shot classification plus keyword heuristics.
pub struct DocumentClassifier {
    model: Arc<dyn ZeroShotClassifier>,
    sample_tokens: usize,
}

impl DocumentClassifier {
    pub fn new(model: Arc<dyn ZeroShotClassifier>) -> Self {
        Self {
            model,
            sample_tokens: labels::SAMPLE_TOKENS,
        }
    }

    pub fn with_sample_tokens(mut self, sample_tokens: usize) -> Self {
        self.sample_tokens = sample_tokens.max(1);
        self
    }

    pub async fn classify_document_type(&self, text: &str) -> Result<TypeClassification, InferenceError> {
        let sample = sample_tokens(text, self.sample_tokens);
        let ranked = self
            .ranked(&sample, &labels::DOCUMENT_TYPES, labels::TYPE_HYPOTHESIS)
            .await?;

        let top = &ranked[0];

        Ok(TypeClassification {
            document_type: top.label.clone(),
            confidence: top.score,
            all_types: ranked
                .iter()
                .map(|l| TypeScore {
                    doc_type: l.label.clone(),
                    score: l.score,
                })
                .collect(),
        })
    }

    pub async fn determine_priority(&self, text: &str) -> Result<PriorityAssessment, InferenceError> {
        let signals = UrgencySignals::scan(text);

        let sample = sample_tokens(text, self.sample_tokens);
        let ranked = self
            .ranked(&sample, &labels::PRIORITY_LEVELS, labels::PRIORITY_HYPOTHESIS)
            .await?;

        let top = &ranked[0];
        let priority = escalate_priority(&top.label, signals);

        if priority != top.label {
            tracing::debug!(
                model_priority = %top.label,
                priority = %priority,
                "Priority escalated by urgency keywords"
            );
        }

        Ok(PriorityAssessment {
            priority,
            confidence: top.score,
            contains_explicit_urgency: signals.explicit_terms,
            contains_deadline: signals.deadlines,
            all_priorities: ranked
                .iter()
                .map(|l| PriorityScore {
                    priority: l.label.clone(),
                    score: l.score,
                })
                .collect(),
        })
    }

    /// Full document classification including type and priority.
    pub async fn classify_document(&self, text: &str) -> Result<ClassificationResult, InferenceError> {
        let type_result = self.classify_document_type(text).await?;
        let priority_result = self.determine_priority(text).await?;

        tracing::info!(
            model = self.model.model_id(),
            document_type = %type_result.document_type,
            priority = %priority_result.priority,
            "Document classified"
        );

        Ok(ClassificationResult {
            document_type: type_result.document_type,
            type_confidence: type_result.confidence,
            all_types: type_result.all_types,
            priority: priority_result.priority,
            priority_confidence: priority_result.confidence,
            urgency_indicators: UrgencySignals {
                explicit_terms: priority_result.contains_explicit_urgency,
                deadlines: priority_result.contains_deadline,
            },
        })
    }

    /// Ranked labels, guaranteed non-empty.
    async fn ranked(
        &self,
        sample: &str,
        candidates: &[&str],
        template: &str,
    ) -> Result<Vec<LabelScore>, InferenceError> {
        let ranked = rank_labels(self.model.classify(sample, candidates, template).await?);

        if ranked.is_empty() {
            return Err(InferenceError::EmptyOutput {
                model: self.model.model_id().to_string(),
                what: "labels",
            });
        }

        Ok(ranked)
    }
}
