use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use classify::ClassificationResult;
use extract::ExtractedEntities;
use ingest::LoadedDocument;
use summarize::{SummaryBounds, SummaryResult};

use crate::error::ApiError;
use crate::metrics::MetricsSnapshot;
use crate::AppState;

const SUCCESS: &str = "success";

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/extract", post(extract_entities))
        .route("/classify", post(classify_document))
        .route("/summarize", post(summarize_document))
        .route("/process", post(process_document))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Optional summary length overrides, in words.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
}

impl SummaryParams {
    fn bounds(&self, defaults: SummaryBounds) -> Option<SummaryBounds> {
        if self.max_length.is_none() && self.min_length.is_none() {
            return None;
        }

        Some(SummaryBounds::new(
            self.max_length.unwrap_or(defaults.max_length),
            self.min_length.unwrap_or(defaults.min_length),
        ))
    }
}

#[derive(Serialize)]
struct ExtractResponse {
    status: &'static str,
    filename: String,
    file_type: &'static str,
    entities: ExtractedEntities,
}

#[derive(Serialize)]
struct ClassifyResponse {
    status: &'static str,
    filename: String,
    file_type: &'static str,
    classification: ClassificationResult,
}

#[derive(Serialize)]
struct SummarizeResponse {
    status: &'static str,
    filename: String,
    file_type: &'static str,
    summary: SummaryResult,
}

#[derive(Serialize)]
struct ProcessResponse {
    status: &'static str,
    filename: String,
    file_type: &'static str,
    text_length: usize,
    entities: ExtractedEntities,
    classification: ClassificationResult,
    summary: SummaryResult,
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Document Intelligence API",
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn extract_entities(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let result = async {
        let (upload, document) = load_upload(&state, multipart).await?;
        let entities = state.extract(&document.text).await?;

        Ok::<_, ApiError>(ExtractResponse {
            status: SUCCESS,
            filename: upload.filename,
            file_type: document.extension(),
            entities,
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn classify_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let result = async {
        let (upload, document) = load_upload(&state, multipart).await?;
        let classification = state.classify(&document.text).await?;

        Ok::<_, ApiError>(ClassifyResponse {
            status: SUCCESS,
            filename: upload.filename,
            file_type: document.extension(),
            classification,
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn summarize_document(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
    multipart: Multipart,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let result = async {
        let (upload, document) = load_upload(&state, multipart).await?;
        let bounds = params.bounds(state.summarizer.default_bounds());
        let summary = state.summarize(&document.text, bounds).await?;

        Ok::<_, ApiError>(SummarizeResponse {
            status: SUCCESS,
            filename: upload.filename,
            file_type: document.extension(),
            summary,
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

/// Entities, classification and summary for one upload, computed concurrently.
async fn process_document(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let result = async {
        let (upload, document) = load_upload(&state, multipart).await?;
        let text = document.text.as_str();
        let bounds = params.bounds(state.summarizer.default_bounds());

        let (entities, classification, summary) = tokio::try_join!(
            state.extract(text),
            state.classify(text),
            state.summarize(text, bounds),
        )?;

        tracing::info!(
            doc_id = %document.id,
            filename = %upload.filename,
            entities = entities.total(),
            document_type = %classification.document_type,
            priority = %classification.priority,
            "Document processed"
        );

        Ok::<_, ApiError>(ProcessResponse {
            status: SUCCESS,
            filename: upload.filename,
            file_type: document.extension(),
            text_length: document.char_count(),
            entities,
            classification,
            summary,
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn load_upload(
    state: &AppState,
    multipart: Multipart,
) -> Result<(Upload, LoadedDocument), ApiError> {
    let upload = read_file_field(multipart).await?;
    let document = state.load(&upload.filename, &upload.bytes).await?;
    Ok((upload, document))
}

/// The first multipart field named `file`.
async fn read_file_field(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadUpload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadUpload(e.to_string()))?;

        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::MissingFile)
}
