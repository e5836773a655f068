pub mod chunk;
pub mod chunker;
pub mod error;
pub mod loader;
pub mod reader;

pub use chunk::{SentenceChunk, TextWindow};
pub use chunker::{char_windows, count_words, split_sentences, ChunkerConfig, SentenceChunker};
pub use error::{LoadError, LoadResult};
pub use loader::{DocumentLoader, LoadedDocument};
pub use reader::{
    extract_docx_text, extract_pdf_text, extract_text, extract_txt_text, DocumentFormat,
};

use sha2::{Digest, Sha256};

/// Generate a stable document ID from file contents
pub fn generate_doc_id(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode(&result[..16])
}
