use thiserror::Error;

use crate::reader::DocumentFormat;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {format} document: {message}")]
    Extraction {
        format: DocumentFormat,
        message: String,
    },

    /// The file parsed but produced no text (e.g. a scanned PDF without a text layer).
    #[error("Document contains no extractable text")]
    EmptyDocument,

    #[error("I/O error while loading document: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub(crate) fn extraction(format: DocumentFormat, message: impl ToString) -> Self {
        Self::Extraction {
            format,
            message: message.to_string(),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
