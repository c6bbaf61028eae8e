//! Adapter between callers and the classification capability.
//!
//! Every call produces a [`ClassificationOutcome`]. Failures of the model,
//! the detector or the translator are logged and turned into the neutral
//! fallback here; nothing past this point ever sees them.
use std::borrow::Cow;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use super::{ClassificationResult, EmotionModel, ModelError};
use crate::emotion::{EmotionLabel, FALLBACK_LABEL};
use crate::language::{LanguageCode, LanguageDetector};
use crate::observability::metrics::Metrics;
use crate::translation::{TranslateError, Translator};

/// Where an outcome's results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    /// Ranked output of the model.
    Model,
    /// Blank input; the model was not called.
    EmptyInput,
    /// The model or a language collaborator failed.
    Fallback,
}

/// Ranked classification. Never empty: skipped or failed calls carry the
/// single result `("neutre", 0.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationOutcome {
    results: Vec<ClassificationResult>,
    source: OutcomeSource,
}

impl ClassificationOutcome {
    fn neutral(source: OutcomeSource) -> Self {
        Self {
            results: vec![ClassificationResult::new(FALLBACK_LABEL, 0.0)],
            source,
        }
    }

    #[must_use]
    pub fn empty_input() -> Self {
        Self::neutral(OutcomeSource::EmptyInput)
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self::neutral(OutcomeSource::Fallback)
    }

    /// Sorts by descending score. The sort is stable, so ties keep the
    /// model's output order.
    fn ranked(mut results: Vec<ClassificationResult>) -> Self {
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self {
            results,
            source: OutcomeSource::Model,
        }
    }

    #[must_use]
    pub fn source(&self) -> OutcomeSource {
        self.source
    }

    #[must_use]
    pub fn is_model_output(&self) -> bool {
        self.source == OutcomeSource::Model
    }

    #[must_use]
    pub fn results(&self) -> &[ClassificationResult] {
        &self.results
    }

    /// Highest-scoring result.
    #[must_use]
    pub fn dominant(&self) -> &ClassificationResult {
        // Constructors guarantee at least one element.
        &self.results[0]
    }

    /// Labels of the `k` best results, or nothing when the outcome is a
    /// fallback or a skipped call.
    #[must_use]
    pub fn top_labels(&self, k: usize) -> Vec<EmotionLabel> {
        if !self.is_model_output() {
            return Vec::new();
        }
        self.results
            .iter()
            .take(k)
            .map(|result| result.label.clone())
            .collect()
    }
}

#[derive(Debug, Error)]
enum ClassifyError {
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Language-aware front of an [`EmotionModel`].
pub struct ClassifierAdapter {
    model: Box<dyn EmotionModel>,
    detector: Box<dyn LanguageDetector>,
    translator: Option<Box<dyn Translator>>,
    native: LanguageCode,
    metrics: Option<Metrics>,
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("model", &self.model.name())
            .field("native", &self.native)
            .field("translator", &self.translator.is_some())
            .finish_non_exhaustive()
    }
}

impl ClassifierAdapter {
    #[must_use]
    pub fn new(
        model: Box<dyn EmotionModel>,
        detector: Box<dyn LanguageDetector>,
        native: LanguageCode,
    ) -> Self {
        Self {
            model,
            detector,
            translator: None,
            native,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn native_language(&self) -> &LanguageCode {
        &self.native
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Detects the language of `text`. Any detection failure resolves to the
    /// native language.
    #[must_use]
    pub fn detect_language(&self, text: &str) -> LanguageCode {
        match self.detector.detect(text) {
            Ok(code) => code,
            Err(error) => {
                debug!(%error, native = %self.native, "language detection failed, assuming native language");
                self.native.clone()
            }
        }
    }

    /// Classifies `text` written in `language`.
    ///
    /// Blank text short-circuits to `("neutre", 0.0)` without calling the
    /// model. Failures yield the same pair with [`OutcomeSource::Fallback`].
    #[must_use]
    pub fn classify(&self, text: &str, language: &LanguageCode) -> ClassificationOutcome {
        if text.trim().is_empty() {
            return ClassificationOutcome::empty_input();
        }

        let started = Instant::now();
        let outcome = match self.try_classify(text, language) {
            Ok(results) => ClassificationOutcome::ranked(results),
            Err(error) => {
                warn!(
                    %error,
                    model = self.model.name(),
                    language = %language,
                    "classification failed, using neutral fallback"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.classifier_fallbacks.inc();
                }
                ClassificationOutcome::fallback()
            }
        };
        if let Some(metrics) = &self.metrics {
            metrics
                .classify_duration
                .observe(started.elapsed().as_secs_f64());
        }
        outcome
    }

    /// Detects the language of `text`, then classifies it.
    #[must_use]
    pub fn classify_text(&self, text: &str) -> ClassificationOutcome {
        if text.trim().is_empty() {
            return ClassificationOutcome::empty_input();
        }
        let language = self.detect_language(text);
        self.classify(text, &language)
    }

    fn try_classify(
        &self,
        text: &str,
        language: &LanguageCode,
    ) -> Result<Vec<ClassificationResult>, ClassifyError> {
        let text = self.to_native(text, language)?;

        let results = self.model.predict(&text)?;
        if results.is_empty() {
            return Err(ModelError::EmptyOutput.into());
        }

        results
            .into_iter()
            .map(|result| {
                if result.score.is_finite() {
                    Ok(ClassificationResult {
                        score: result.score.clamp(0.0, 1.0),
                        label: result.label,
                    })
                } else {
                    Err(ModelError::InvalidScore(result.label.to_string()).into())
                }
            })
            .collect()
    }

    fn to_native<'a>(
        &self,
        text: &'a str,
        language: &LanguageCode,
    ) -> Result<Cow<'a, str>, TranslateError> {
        if *language == self.native {
            return Ok(Cow::Borrowed(text));
        }

        match &self.translator {
            Some(translator) if translator.supports(language, &self.native) => {
                let translated = translator.translate(text, language, &self.native)?;
                debug!(from = %language, to = %self.native, "translated text before classification");
                Ok(Cow::Owned(translated))
            }
            _ => {
                debug!(
                    language = %language,
                    "no translation path, classifying original text"
                );
                Ok(Cow::Borrowed(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::language::DetectError;

    struct ScriptedModel {
        output: Result<Vec<(&'static str, f32)>, ()>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn returning(output: Vec<(&'static str, f32)>) -> Self {
            Self {
                output: Ok(output),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                output: Err(()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl EmotionModel for &'static ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError> {
            self.calls.lock().unwrap().push(text.to_string());
            match &self.output {
                Ok(scores) => Ok(scores
                    .iter()
                    .map(|(label, score)| ClassificationResult::new(*label, *score))
                    .collect()),
                Err(()) => Err(ModelError::Unavailable("scripted failure".into())),
            }
        }
    }

    struct FixedDetector(Option<&'static str>);

    impl LanguageDetector for FixedDetector {
        fn detect(&self, _text: &str) -> Result<LanguageCode, DetectError> {
            self.0
                .and_then(LanguageCode::parse)
                .ok_or(DetectError::Undetermined)
        }
    }

    struct UppercaseTranslator {
        fail: bool,
    }

    impl Translator for UppercaseTranslator {
        fn supports(&self, source: &LanguageCode, _target: &LanguageCode) -> bool {
            source.as_str() == "fr"
        }

        fn translate(
            &self,
            text: &str,
            _source: &LanguageCode,
            _target: &LanguageCode,
        ) -> Result<String, TranslateError> {
            if self.fail {
                Err(TranslateError::EmptyOutput)
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn leak(model: ScriptedModel) -> &'static ScriptedModel {
        Box::leak(Box::new(model))
    }

    fn adapter(model: &'static ScriptedModel, detected: Option<&'static str>) -> ClassifierAdapter {
        ClassifierAdapter::new(
            Box::new(model),
            Box::new(FixedDetector(detected)),
            LanguageCode::english(),
        )
    }

    fn fr() -> LanguageCode {
        LanguageCode::parse("fr").unwrap()
    }

    #[test]
    fn blank_text_short_circuits_without_calling_the_model() {
        let model = leak(ScriptedModel::returning(vec![("joy", 0.9)]));
        let adapter = adapter(model, Some("en"));

        let outcome = adapter.classify("   ", &LanguageCode::english());

        assert_eq!(outcome.source(), OutcomeSource::EmptyInput);
        assert_eq!(outcome.dominant().label.as_str(), "neutre");
        assert!(outcome.dominant().score.abs() < f32::EPSILON);
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn results_are_sorted_by_descending_score() {
        let model = leak(ScriptedModel::returning(vec![
            ("anger", 0.1),
            ("joy", 0.7),
            ("sadness", 0.2),
        ]));
        let outcome = adapter(model, Some("en")).classify("what a day", &LanguageCode::english());

        let labels: Vec<_> = outcome.results().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["joy", "sadness", "anger"]);
        assert!(outcome.is_model_output());
    }

    #[test]
    fn ties_keep_model_order() {
        let model = leak(ScriptedModel::returning(vec![
            ("surprise", 0.4),
            ("joy", 0.4),
            ("fear", 0.2),
        ]));
        let outcome = adapter(model, Some("en")).classify("oh", &LanguageCode::english());
        assert_eq!(outcome.dominant().label.as_str(), "surprise");
    }

    #[test]
    fn model_failure_becomes_neutral_fallback() {
        let model = leak(ScriptedModel::failing());
        let outcome = adapter(model, Some("en")).classify("hello there", &LanguageCode::english());

        assert_eq!(outcome.source(), OutcomeSource::Fallback);
        assert_eq!(outcome.dominant(), &ClassificationResult::new("neutre", 0.0));
        assert!(outcome.top_labels(2).is_empty());
    }

    #[test]
    fn empty_model_output_becomes_fallback() {
        let model = leak(ScriptedModel::returning(vec![]));
        let outcome = adapter(model, Some("en")).classify("hello", &LanguageCode::english());
        assert_eq!(outcome.source(), OutcomeSource::Fallback);
    }

    #[test]
    fn non_finite_score_becomes_fallback() {
        let model = leak(ScriptedModel::returning(vec![("joy", f32::NAN)]));
        let outcome = adapter(model, Some("en")).classify("hello", &LanguageCode::english());
        assert_eq!(outcome.source(), OutcomeSource::Fallback);
    }

    #[test]
    fn foreign_text_is_translated_when_a_path_exists() {
        let model = leak(ScriptedModel::returning(vec![("joy", 0.8)]));
        let adapter = adapter(model, Some("fr"))
            .with_translator(Box::new(UppercaseTranslator { fail: false }));

        let outcome = adapter.classify_text("quelle belle journée");

        assert!(outcome.is_model_output());
        assert_eq!(
            model.calls.lock().unwrap().as_slice(),
            ["QUELLE BELLE JOURNÉE"]
        );
    }

    #[test]
    fn unsupported_language_is_classified_as_is() {
        let model = leak(ScriptedModel::returning(vec![("joy", 0.8)]));
        let adapter = adapter(model, Some("de"))
            .with_translator(Box::new(UppercaseTranslator { fail: false }));

        let outcome = adapter.classify_text("ein schöner Tag");

        assert!(outcome.is_model_output());
        assert_eq!(model.calls.lock().unwrap().as_slice(), ["ein schöner Tag"]);
    }

    #[test]
    fn translation_failure_becomes_fallback() {
        let model = leak(ScriptedModel::returning(vec![("joy", 0.8)]));
        let adapter =
            adapter(model, Some("fr")).with_translator(Box::new(UppercaseTranslator { fail: true }));

        let outcome = adapter.classify("bonjour", &fr());

        assert_eq!(outcome.source(), OutcomeSource::Fallback);
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn detection_failure_assumes_native_language() {
        let model = leak(ScriptedModel::returning(vec![("joy", 0.8)]));
        let adapter = adapter(model, None)
            .with_translator(Box::new(UppercaseTranslator { fail: false }));

        assert_eq!(adapter.detect_language("hm"), LanguageCode::english());
        let _ = adapter.classify_text("hm");
        assert_eq!(model.calls.lock().unwrap().as_slice(), ["hm"]);
    }

    #[test]
    fn fallback_is_counted() {
        let metrics = Metrics::detached();
        let model = leak(ScriptedModel::failing());
        let adapter = adapter(model, Some("en")).with_metrics(metrics.clone());

        let _ = adapter.classify("hello", &LanguageCode::english());

        assert!((metrics.classifier_fallbacks.get() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_labels_takes_the_best_k() {
        let model = leak(ScriptedModel::returning(vec![
            ("fear", 0.5),
            ("joy", 0.1),
            ("sadness", 0.3),
        ]));
        let outcome = adapter(model, Some("en")).classify("dark night", &LanguageCode::english());
        let labels: Vec<_> = outcome
            .top_labels(2)
            .into_iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(labels, ["fear", "sadness"]);
    }
}
