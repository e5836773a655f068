pub mod merge;
pub mod schema;

pub use merge::{merge, SUPPLEMENTED_CATEGORIES};
pub use schema::{Entity, EntityCategory, ExtractedEntities, SECONDARY_SOURCE};

use inference::{InferenceError, TokenClassifier, TokenSpan};
use std::sync::Arc;

/// Input limit of the secondary model, in characters.
pub const DEFAULT_WINDOW_CHARS: usize = 512;

/// Runs two NER models over a document and merges their findings.
pub struct EntityExtractor {
    primary: Arc<dyn TokenClassifier>,
    secondary: Arc<dyn TokenClassifier>,
    window_chars: usize,
}

impl EntityExtractor {
    pub fn new(primary: Arc<dyn TokenClassifier>, secondary: Arc<dyn TokenClassifier>) -> Self {
        Self {
            primary,
            secondary,
            window_chars: DEFAULT_WINDOW_CHARS,
        }
    }

    pub fn with_window_chars(mut self, window_chars: usize) -> Self {
        self.window_chars = window_chars.max(1);
        self
    }

    /// Entities from the primary model, which accepts the whole document.
    pub async fn extract_entities_primary(&self, text: &str) -> Result<Vec<Entity>, InferenceError> {
        let spans = self.primary.classify_tokens(text).await?;
        Ok(spans.into_iter().map(|span| to_entity(span, 0)).collect())
    }

    /// Entities from the secondary model, run window by window. Offsets are
    /// shifted back into whole-document coordinates.
    pub async fn extract_entities_secondary(&self, text: &str) -> Result<Vec<Entity>, InferenceError> {
        let mut entities = Vec::new();

        for window in ingest::char_windows(text, self.window_chars) {
            let spans = self.secondary.classify_tokens(&window.text).await?;
            let shift = window.offset.0;
            entities.extend(spans.into_iter().map(|span| to_entity(span, shift)));
        }

        Ok(entities)
    }

    /// Extract key business information (people, organizations, dates,
    /// amounts, locations) from both models.
    pub async fn extract_key_information(&self, text: &str) -> Result<ExtractedEntities, InferenceError> {
        let (primary, secondary) = tokio::try_join!(
            self.extract_entities_primary(text),
            self.extract_entities_secondary(text),
        )?;

        let primary_count = primary.len();
        let secondary_count = secondary.len();

        let merged = merge(
            ExtractedEntities::from_primary(primary),
            ExtractedEntities::from_secondary(secondary),
        );

        tracing::info!(
            primary_model = self.primary.model_id(),
            secondary_model = self.secondary.model_id(),
            primary_count,
            secondary_count,
            merged_count = merged.total(),
            "Entities extracted"
        );

        Ok(merged)
    }
}

fn to_entity(span: TokenSpan, shift: usize) -> Entity {
    Entity {
        text: span.word,
        label: span.entity_group,
        start: span.start + shift,
        end: span.end + shift,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const CONTRACT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/contract.txt"));

    /// Reports every occurrence of a fixed set of phrases, like a real tagger would.
    struct PhraseTagger {
        name: &'static str,
        phrases: Vec<(&'static str, &'static str)>,
        inputs: Mutex<Vec<String>>,
    }

    impl PhraseTagger {
        fn new(name: &'static str, phrases: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                name,
                phrases,
                inputs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TokenClassifier for PhraseTagger {
        fn model_id(&self) -> &str {
            self.name
        }

        async fn classify_tokens(&self, text: &str) -> Result<Vec<TokenSpan>, InferenceError> {
            self.inputs.lock().unwrap().push(text.to_string());

            let mut spans = Vec::new();
            for (phrase, group) in &self.phrases {
                for (byte_idx, _) in text.match_indices(phrase) {
                    let start = text[..byte_idx].chars().count();
                    spans.push(TokenSpan {
                        entity_group: group.to_string(),
                        word: phrase.to_string(),
                        start,
                        end: start + phrase.chars().count(),
                        score: 0.99,
                    });
                }
            }
            spans.sort_by_key(|s| s.start);
            Ok(spans)
        }
    }

    struct BrokenTagger;

    #[async_trait]
    impl TokenClassifier for BrokenTagger {
        fn model_id(&self) -> &str {
            "broken"
        }

        async fn classify_tokens(&self, _text: &str) -> Result<Vec<TokenSpan>, InferenceError> {
            Err(InferenceError::Status {
                model: "broken".to_string(),
                status: 500,
                body: "internal error".to_string(),
            })
        }
    }

    fn contract_primary() -> PhraseTagger {
        PhraseTagger::new(
            "primary",
            vec![
                ("ABC Corporation", "ORG"),
                ("XYZ Ltd.", "ORG"),
                ("January 15, 2023", "DATE"),
                ("$5,000", "MONEY"),
                ("New York", "GPE"),
                ("John Smith", "PERSON"),
                ("30 days", "DATE"),
            ],
        )
    }

    fn contract_secondary() -> PhraseTagger {
        PhraseTagger::new(
            "secondary",
            vec![
                ("ABC Corporation", "ORG"),
                ("John Smith", "PER"),
                ("San Francisco", "LOC"),
                ("CEO", "MISC"),
            ],
        )
    }

    fn char_slice(text: &str, start: usize, end: usize) -> String {
        text.chars().skip(start).take(end - start).collect()
    }

    #[tokio::test]
    async fn test_contract_organizations() {
        let extractor = EntityExtractor::new(Arc::new(contract_primary()), Arc::new(contract_secondary()));

        let entities = extractor.extract_key_information(CONTRACT).await.unwrap();
        let orgs: Vec<&str> = entities.organizations.iter().map(|e| e.text.as_str()).collect();

        assert!(orgs.contains(&"ABC Corporation"));
        assert!(orgs.contains(&"XYZ Ltd."));
        assert!(entities.organizations.iter().all(|e| e.source.is_none()));
        assert!(!entities.people.is_empty());
        assert!(!entities.dates.is_empty());
        assert!(!entities.monetary_values.is_empty());

        assert_eq!(entities.people.iter().filter(|e| e.text == "John Smith").count(), 1);
        let city = entities.locations.iter().find(|e| e.text == "San Francisco").unwrap();
        assert_eq!(city.source.as_deref(), Some(SECONDARY_SOURCE));
        assert_eq!(city.label, "LOC");
        assert!(entities.other_entities.iter().all(|e| e.text != "CEO"));
    }

    #[tokio::test]
    async fn test_secondary_offsets_are_document_relative() {
        let secondary = Arc::new(PhraseTagger::new("secondary", vec![("Acme", "ORG")]));
        let extractor = EntityExtractor::new(Arc::new(PhraseTagger::new("primary", vec![])), secondary.clone())
            .with_window_chars(16);

        let text = "Intro text here. Payment from Acme arrives. Acme confirmed.";
        let entities = extractor.extract_entities_secondary(text).await.unwrap();

        assert!(secondary.inputs.lock().unwrap().len() >= 3);
        assert!(!entities.is_empty());
        for entity in &entities {
            assert_eq!(char_slice(text, entity.start, entity.end), "Acme");
        }
    }

    #[tokio::test]
    async fn test_windows_are_bounded() {
        let secondary = Arc::new(PhraseTagger::new("secondary", vec![]));
        let extractor = EntityExtractor::new(Arc::new(PhraseTagger::new("primary", vec![])), secondary.clone());

        let text = "word ".repeat(300);
        extractor.extract_entities_secondary(&text).await.unwrap();

        let inputs = secondary.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 3);
        assert!(inputs.iter().all(|w| w.chars().count() <= DEFAULT_WINDOW_CHARS));
        assert_eq!(inputs.concat(), text);
    }

    #[tokio::test]
    async fn test_extraction_is_repeatable() {
        let extractor = EntityExtractor::new(Arc::new(contract_primary()), Arc::new(contract_secondary()));

        let first = extractor.extract_key_information(CONTRACT).await.unwrap();
        let second = extractor.extract_key_information(CONTRACT).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_any_model_failure_fails_extraction() {
        let extractor = EntityExtractor::new(Arc::new(contract_primary()), Arc::new(BrokenTagger));
        assert!(extractor.extract_key_information(CONTRACT).await.is_err());

        let extractor = EntityExtractor::new(Arc::new(BrokenTagger), Arc::new(contract_secondary()));
        assert!(extractor.extract_key_information(CONTRACT).await.is_err());
    }
}
