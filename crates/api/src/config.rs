use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use inference::RetryPolicy;
use summarize::SummaryBounds;

/// Names the JSON config file to read before environment overrides.
pub const CONFIG_PATH_VAR: &str = "DOCINTEL_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub models: ModelConfig,
    pub retry: RetryConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    /// Staging directory for uploads; the OS temp dir when unset.
    pub upload_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub wait_for_model: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub primary_ner: String,
    pub secondary_ner: String,
    pub zero_shot: String,
    pub summarization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ner_window_chars: usize,
    pub classification_sample_tokens: usize,
    pub summary_max_length: usize,
    pub summary_min_length: usize,
    pub chunk_max_words: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            log_format: LogFormat::Pretty,
            upload_dir: None,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            api_token: None,
            request_timeout_secs: 120,
            wait_for_model: true,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary_ner: "spacy/en_core_web_sm".to_string(),
            secondary_ner: "dslim/bert-base-NER".to_string(),
            zero_shot: "facebook/bart-large-mnli".to_string(),
            summarization: "facebook/bart-large-cnn".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 10000,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let bounds = SummaryBounds::default();
        Self {
            ner_window_chars: extract::DEFAULT_WINDOW_CHARS,
            classification_sample_tokens: 1024,
            summary_max_length: bounds.max_length,
            summary_min_length: bounds.min_length,
            chunk_max_words: 1024,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.initial_backoff_ms, self.max_backoff_ms)
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AnalysisConfig {
    pub fn summary_bounds(&self) -> SummaryBounds {
        SummaryBounds::new(self.summary_max_length, self.summary_min_length)
    }
}

impl AppConfig {
    /// Defaults, then the file named by `DOCINTEL_CONFIG` (if set), then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(addr) = lookup("DOCINTEL_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(url) = lookup("DOCINTEL_INFERENCE_URL") {
            self.inference.base_url = url;
        }
        if let Some(token) = lookup("HF_API_TOKEN").filter(|t| !t.is_empty()) {
            self.inference.api_token = Some(token);
        }
        if let Some(format) = lookup("DOCINTEL_LOG_FORMAT") {
            self.server.log_format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => anyhow::bail!("Unknown log format: {}", other),
            };
        }
        if let Some(dir) = lookup("DOCINTEL_UPLOAD_DIR") {
            self.server.upload_dir = Some(PathBuf::from(dir));
        }
        if let Some(limit) = lookup("DOCINTEL_MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = limit
                .parse()
                .with_context(|| format!("Invalid DOCINTEL_MAX_UPLOAD_BYTES: {}", limit))?;
        }

        Ok(())
    }
}
