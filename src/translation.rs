//! Translation capability used to bring text into the classifier's native
//! language.
use thiserror::Error;

use crate::language::LanguageCode;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("translation service returned an empty text")]
    EmptyOutput,
}

/// Text → text capability between two languages.
pub trait Translator: Send + Sync {
    /// Whether a translation path exists for this pair.
    fn supports(&self, source: &LanguageCode, target: &LanguageCode) -> bool;

    fn translate(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Result<String, TranslateError>;
}
