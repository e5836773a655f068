//! Model seams shared by the analysis crates.
//!
//! The analysis crates only see the [`TokenClassifier`], [`ZeroShotClassifier`]
//! and [`SummarizationModel`] traits. [`HfModel`] implements all three against a
//! hosted inference endpoint; tests substitute their own implementations.

pub mod client;
pub mod error;
pub mod models;
pub mod retry;

pub use client::{HfModel, InferenceClient};
pub use error::InferenceError;
pub use models::{
    rank_labels, LabelScore, SummarizationModel, TokenClassifier, TokenSpan, ZeroShotClassifier,
};
pub use retry::RetryPolicy;
