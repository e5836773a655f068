use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::{LoadError, LoadResult};

/// File formats the loader knows how to turn into plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolve a format from an extension, with or without the leading dot.
    /// Matching is case-insensitive.
    pub fn from_extension(extension: &str) -> LoadResult<Self> {
        let normalized = extension.trim_start_matches('.').to_lowercase();

        match normalized.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            "" => Err(LoadError::UnsupportedFormat(String::new())),
            other => Err(LoadError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        Self::from_extension(extension)
    }

    /// Uploaded filenames are only inspected for their extension, never used as paths.
    pub fn from_filename(filename: &str) -> LoadResult<Self> {
        Self::from_path(Path::new(filename))
    }

    /// Lowercased extension including the dot, e.g. `.pdf`.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
            Self::Txt => ".txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
        };
        f.write_str(name)
    }
}

/// Dispatch raw file bytes to the extractor for `format`.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> LoadResult<String> {
    match format {
        DocumentFormat::Pdf => extract_pdf_text(bytes),
        DocumentFormat::Docx => extract_docx_text(bytes),
        DocumentFormat::Txt => Ok(extract_txt_text(bytes)),
    }
}

/// Concatenate the text of every page in page order.
pub fn extract_pdf_text(bytes: &[u8]) -> LoadResult<String> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| LoadError::extraction(DocumentFormat::Pdf, e))?;

    let mut text = String::new();

    // get_pages is keyed by page number, so iteration is already in page order
    for page_number in document.get_pages().keys() {
        let page_text = document
            .extract_text(&[*page_number])
            .map_err(|e| {
                LoadError::extraction(
                    DocumentFormat::Pdf,
                    format!("page {}: {}", page_number, e),
                )
            })?;
        text.push_str(&page_text);
    }

    tracing::debug!(chars = text.len(), "PDF text extracted");

    Ok(text)
}

/// Concatenate top-level paragraph text, each paragraph followed by a newline.
pub fn extract_docx_text(bytes: &[u8]) -> LoadResult<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| LoadError::extraction(DocumentFormat::Docx, e))?;

    let mut text = String::new();

    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            push_paragraph_text(paragraph, &mut text);
            text.push('\n');
        }
    }

    tracing::debug!(chars = text.len(), "DOCX text extracted");

    Ok(text)
}

fn push_paragraph_text(paragraph: &docx_rs::Paragraph, output: &mut String) {
    for child in &paragraph.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, output),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for link_child in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = link_child {
                        push_run_text(run, output);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &docx_rs::Run, output: &mut String) {
    for run_child in &run.children {
        if let docx_rs::RunChild::Text(text) = run_child {
            output.push_str(&text.text);
        }
    }
}

/// Plain text never fails: malformed UTF-8 is replaced with U+FFFD.
pub fn extract_txt_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
