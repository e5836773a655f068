pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;

use anyhow::{Context, Result};
use std::sync::Arc;

use classify::{ClassificationResult, DocumentClassifier};
use extract::{EntityExtractor, ExtractedEntities};
use inference::InferenceClient;
use ingest::{ChunkerConfig, DocumentLoader, LoadedDocument, SentenceChunker};
use summarize::{DocumentSummarizer, SummaryBounds, SummaryResult};

pub use config::AppConfig;
pub use error::ApiError;
pub use metrics::{Metrics, MetricsSnapshot, TimedOperation};
pub use routes::router;

/// Services shared by every request. Built once at startup.
pub struct AppState {
    pub loader: DocumentLoader,
    pub extractor: EntityExtractor,
    pub classifier: DocumentClassifier,
    pub summarizer: DocumentSummarizer,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        loader: DocumentLoader,
        extractor: EntityExtractor,
        classifier: DocumentClassifier,
        summarizer: DocumentSummarizer,
    ) -> Self {
        Self {
            loader,
            extractor,
            classifier,
            summarizer,
            metrics: Metrics::new(),
        }
    }

    /// Wire every component to hosted models through one inference client.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = InferenceClient::new(
            config.inference.base_url.clone(),
            config.inference.api_token.clone(),
            config.inference.timeout(),
            config.inference.wait_for_model,
            config.retry.policy(),
        )
        .context("Failed to build inference HTTP client")?;

        let analysis = &config.analysis;

        let loader = match &config.server.upload_dir {
            Some(dir) => DocumentLoader::with_temp_dir(dir),
            None => DocumentLoader::new(),
        };

        let extractor = EntityExtractor::new(
            Arc::new(client.model(&config.models.primary_ner)),
            Arc::new(client.model(&config.models.secondary_ner)),
        )
        .with_window_chars(analysis.ner_window_chars);

        let classifier = DocumentClassifier::new(Arc::new(client.model(&config.models.zero_shot)))
            .with_sample_tokens(analysis.classification_sample_tokens);

        let summarizer = DocumentSummarizer::new(Arc::new(client.model(&config.models.summarization)))
            .with_chunker(SentenceChunker::new(ChunkerConfig {
                max_words: analysis.chunk_max_words,
            }))
            .with_default_bounds(analysis.summary_bounds());

        tracing::info!(
            inference_url = client.base_url(),
            primary_ner = %config.models.primary_ner,
            secondary_ner = %config.models.secondary_ner,
            zero_shot = %config.models.zero_shot,
            summarization = %config.models.summarization,
            "Models configured"
        );

        Ok(Self::new(loader, extractor, classifier, summarizer))
    }

    pub async fn load(&self, filename: &str, bytes: &[u8]) -> Result<LoadedDocument, ApiError> {
        let timer = TimedOperation::start();
        let document = self.loader.load_upload(filename, bytes).await?;
        self.metrics.record_load(timer.elapsed());
        Ok(document)
    }

    pub async fn extract(&self, text: &str) -> Result<ExtractedEntities, ApiError> {
        let timer = TimedOperation::start();
        let entities = self.extractor.extract_key_information(text).await?;
        self.metrics.record_extract(timer.elapsed(), entities.total());
        Ok(entities)
    }

    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, ApiError> {
        let timer = TimedOperation::start();
        let classification = self.classifier.classify_document(text).await?;
        self.metrics.record_classify(timer.elapsed());
        Ok(classification)
    }

    pub async fn summarize(
        &self,
        text: &str,
        bounds: Option<SummaryBounds>,
    ) -> Result<SummaryResult, ApiError> {
        let timer = TimedOperation::start();
        let summary = self.summarizer.generate_summary(text, bounds).await?;
        self.metrics.record_summarize(timer.elapsed());
        Ok(summary)
    }
}
