use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::generate_doc_id;
use crate::reader::{extract_text, DocumentFormat};

/// Plain text extracted from one uploaded or on-disk file.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub id: String,
    pub format: DocumentFormat,
    pub text: String,
}

impl LoadedDocument {
    /// Lowercased extension including the dot, e.g. `.docx`.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    /// Where uploads are staged. `None` means the OS temp dir.
    temp_dir: Option<PathBuf>,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: Some(temp_dir.into()),
        }
    }

    /// Load a document from disk, dispatching on its extension.
    pub async fn load_path(&self, path: &Path) -> LoadResult<LoadedDocument> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        let id = generate_doc_id(&bytes);

        let text = tokio::task::spawn_blocking(move || extract_text(format, &bytes))
            .await
            .map_err(|e| LoadError::extraction(format, e))??;

        if text.trim().is_empty() {
            tracing::warn!(doc_id = %id, %format, "Document has no extractable text");
            return Err(LoadError::EmptyDocument);
        }

        tracing::info!(
            doc_id = %id,
            %format,
            chars = text.len(),
            "Document loaded"
        );

        Ok(LoadedDocument { id, format, text })
    }

    /// Stage uploaded bytes in a temporary file, load it, and remove it.
    ///
    /// The staged file is owned by a `NamedTempFile`, so it is deleted when
    /// this function returns, whether loading succeeded or not.
    pub async fn load_upload(&self, filename: &str, bytes: &[u8]) -> LoadResult<LoadedDocument> {
        let format = DocumentFormat::from_filename(filename)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-").suffix(format.extension());

        let mut staged = match &self.temp_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };

        staged.write_all(bytes)?;
        staged.flush()?;

        tracing::debug!(
            filename,
            staged = %staged.path().display(),
            bytes = bytes.len(),
            "Upload staged"
        );

        let result = self.load_path(staged.path()).await;
        drop(staged);
        result
    }
}
