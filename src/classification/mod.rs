//! Text emotion classification.
//!
//! [`EmotionModel`] is the opaque capability (text in, scored labels out).
//! [`ClassifierAdapter`] wraps it with language normalization, ranking and
//! the neutral fallback.
pub mod adapter;
#[cfg(feature = "bert")]
pub mod bert;
pub mod lexicon;

use serde::Serialize;
use thiserror::Error;

use crate::emotion::EmotionLabel;

pub use adapter::{ClassificationOutcome, ClassifierAdapter, OutcomeSource};
pub use lexicon::LexiconModel;

/// One scored label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: EmotionLabel,
    pub score: f32,
}

impl ClassificationResult {
    #[must_use]
    pub fn new(label: impl Into<EmotionLabel>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model is unavailable: {0}")]
    Unavailable(String),
    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no scores")]
    EmptyOutput,
    #[error("model returned a non-finite score for {0}")]
    InvalidScore(String),
}

/// Text → scored labels capability. One result per label of the model's
/// output vocabulary, in the model's own order.
pub trait EmotionModel: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError>;
}
