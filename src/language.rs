//! Language detection behind a small trait, with a `lingua`-backed default.
//!
//! Detection is best-effort: callers treat every [`DetectError`] as "use the
//! classifier's native language".
use std::fmt;

use lingua::{Language, LanguageDetectorBuilder};
use thiserror::Error;

/// Languages the bundled detector can tell apart.
const DETECTABLE: [Language; 4] = [
    Language::English,
    Language::French,
    Language::German,
    Language::Spanish,
];

/// Lowercase two-letter ISO 639-1 code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parses `en`, `EN`, `en-US`, `fr_FR`... Anything that does not start
    /// with two ASCII letters is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let primary = raw
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default();
        if primary.len() == 2 && primary.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(primary.to_ascii_lowercase()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn english() -> Self {
        Self("en".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("text is empty")]
    Empty,
    #[error("language could not be determined")]
    Undetermined,
    #[error("confidence {confidence:.2} for {language} is below {minimum:.2}")]
    LowConfidence {
        language: LanguageCode,
        confidence: f64,
        minimum: f64,
    },
    #[error("detector returned an unusable language code: {0}")]
    InvalidCode(String),
}

/// Text → language capability.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<LanguageCode, DetectError>;
}

/// `lingua` detector restricted to the languages in [`DETECTABLE`].
pub struct LinguaDetector {
    detector: lingua::LanguageDetector,
    min_confidence: f64,
}

impl fmt::Debug for LinguaDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinguaDetector")
            .field("languages", &DETECTABLE)
            .field("min_confidence", &self.min_confidence)
            .finish_non_exhaustive()
    }
}

impl LinguaDetector {
    /// Builds the detector. Loading the language models is slow, so this is
    /// done once per process.
    #[must_use]
    pub fn new(min_confidence: f64) -> Self {
        let detector = LanguageDetectorBuilder::from_languages(&DETECTABLE)
            .with_minimum_relative_distance(0.01)
            .build();
        Self {
            detector,
            min_confidence,
        }
    }
}

impl LanguageDetector for LinguaDetector {
    fn detect(&self, text: &str) -> Result<LanguageCode, DetectError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DetectError::Empty);
        }

        let language = self
            .detector
            .detect_language_of(text)
            .ok_or(DetectError::Undetermined)?;
        let iso = language.iso_code_639_1().to_string();
        let code = LanguageCode::parse(&iso).ok_or(DetectError::InvalidCode(iso))?;

        let confidence = self.detector.compute_language_confidence(text, language);
        if confidence < self.min_confidence {
            return Err(DetectError::LowConfidence {
                language: code,
                confidence,
                minimum: self.min_confidence,
            });
        }

        Ok(code)
    }
}
