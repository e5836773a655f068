use thiserror::Error;

/// Any failure while invoking a model. No caller recovers from these locally.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Request to model {model} failed: {source}")]
    Transport {
        model: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Model {model} returned {status}: {body}")]
    Status {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse response from model {model}: {message}")]
    Decode { model: String, message: String },

    #[error("Model {model} returned no {what}")]
    EmptyOutput { model: String, what: &'static str },
}

impl InferenceError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            // 503 is what hosted endpoints answer while a model is still loading
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } | Self::EmptyOutput { .. } => false,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Transport { model, .. }
            | Self::Status { model, .. }
            | Self::Decode { model, .. }
            | Self::EmptyOutput { model, .. } => model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        let status = |code| InferenceError::Status {
            model: "m".to_string(),
            status: code,
            body: String::new(),
        };

        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(400).is_transient());
        assert!(!status(401).is_transient());

        let decode = InferenceError::Decode {
            model: "m".to_string(),
            message: "bad json".to_string(),
        };
        assert!(!decode.is_transient());
        assert_eq!(decode.model(), "m");
    }
}
