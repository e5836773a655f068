use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::InferenceError;
use crate::models::{
    rank_labels, LabelScore, SummarizationModel, TokenClassifier, TokenSpan, ZeroShotClassifier,
};
use crate::retry::RetryPolicy;

/// HTTP client for a Hugging Face style inference endpoint
/// (`POST {base_url}/models/{model_id}`).
#[derive(Clone)]
pub struct InferenceClient {
    base_url: String,
    api_token: Option<String>,
    wait_for_model: bool,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct InferenceRequest<'a, P> {
    inputs: &'a str,
    parameters: P,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Serialize)]
struct TokenClassificationParameters {
    aggregation_strategy: &'static str,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    hypothesis_template: &'a str,
    multi_label: bool,
}

#[derive(Serialize)]
struct SummarizationParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

/// Zero-shot endpoints answer either with parallel arrays or with label/score pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Sequence { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<LabelScore>),
}

#[derive(Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

impl InferenceClient {
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        timeout: Duration,
        wait_for_model: bool,
        retry: RetryPolicy,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            wait_for_model,
            retry,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bind this client to one model.
    pub fn model(&self, model_id: impl Into<String>) -> HfModel {
        HfModel {
            client: self.clone(),
            model_id: model_id.into(),
        }
    }

    async fn invoke<P, R>(&self, model_id: &str, inputs: &str, parameters: P) -> Result<R, InferenceError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = InferenceRequest {
            inputs,
            parameters,
            options: RequestOptions {
                wait_for_model: self.wait_for_model,
            },
        };

        let started = Instant::now();
        let result = self
            .retry
            .retry(model_id, InferenceError::is_transient, || {
                self.post_once(model_id, &request)
            })
            .await;

        tracing::debug!(
            model = model_id,
            input_chars = inputs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Model invoked"
        );

        result
    }

    async fn post_once<B, R>(&self, model_id: &str, body: &B) -> Result<R, InferenceError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}/models/{}", self.base_url, model_id);

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| InferenceError::Transport {
            model: model_id.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| InferenceError::Transport {
            model: model_id.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                model: model_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| InferenceError::Decode {
            model: model_id.to_string(),
            message: e.to_string(),
        })
    }
}

/// One hosted model. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct HfModel {
    client: InferenceClient,
    model_id: String,
}

#[async_trait]
impl TokenClassifier for HfModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn classify_tokens(&self, text: &str) -> Result<Vec<TokenSpan>, InferenceError> {
        let parameters = TokenClassificationParameters {
            aggregation_strategy: "simple",
        };
        self.client.invoke(&self.model_id, text, parameters).await
    }
}

#[async_trait]
impl ZeroShotClassifier for HfModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        hypothesis_template: &str,
    ) -> Result<Vec<LabelScore>, InferenceError> {
        let parameters = ZeroShotParameters {
            candidate_labels,
            hypothesis_template,
            multi_label: false,
        };

        let response: ZeroShotResponse = self.client.invoke(&self.model_id, text, parameters).await?;
        let labels = zero_shot_labels(&self.model_id, response)?;

        if labels.is_empty() {
            return Err(InferenceError::EmptyOutput {
                model: self.model_id.clone(),
                what: "labels",
            });
        }

        Ok(rank_labels(labels))
    }
}

fn zero_shot_labels(model_id: &str, response: ZeroShotResponse) -> Result<Vec<LabelScore>, InferenceError> {
    match response {
        ZeroShotResponse::Sequence { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(InferenceError::Decode {
                    model: model_id.to_string(),
                    message: format!("{} labels but {} scores", labels.len(), scores.len()),
                });
            }
            Ok(labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect())
        }
        ZeroShotResponse::Pairs(pairs) => Ok(pairs),
    }
}

#[async_trait]
impl SummarizationModel for HfModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, InferenceError> {
        let parameters = SummarizationParameters {
            max_length,
            min_length,
            do_sample: false,
        };

        let outputs: Vec<SummarizationOutput> =
            self.client.invoke(&self.model_id, text, parameters).await?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .ok_or_else(|| InferenceError::EmptyOutput {
                model: self.model_id.clone(),
                what: "summary",
            })
    }
}
