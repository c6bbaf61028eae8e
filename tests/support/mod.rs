//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mood_recommender::catalog::IndexedMovie;
use mood_recommender::classification::{
    ClassificationResult, ClassifierAdapter, EmotionModel, ModelError,
};
use mood_recommender::emotion::EmotionLabel;
use mood_recommender::language::{DetectError, LanguageCode, LanguageDetector};

/// Model double returning a fixed score list (or failing) and recording
/// every text it receives.
#[derive(Clone)]
pub struct RecordingModel {
    output: Option<Vec<(String, f32)>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingModel {
    pub fn returning(scores: &[(&str, f32)]) -> Self {
        Self {
            output: Some(
                scores
                    .iter()
                    .map(|(label, score)| ((*label).to_string(), *score))
                    .collect(),
            ),
            calls: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            output: None,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl EmotionModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.output {
            Some(scores) => Ok(scores
                .iter()
                .map(|(label, score)| ClassificationResult::new(label.as_str(), *score))
                .collect()),
            None => Err(ModelError::Unavailable("model offline".into())),
        }
    }
}

/// Detector that always fails, so every text is treated as native.
pub struct NoDetection;

impl LanguageDetector for NoDetection {
    fn detect(&self, _text: &str) -> Result<LanguageCode, DetectError> {
        Err(DetectError::Undetermined)
    }
}

pub fn adapter(model: &RecordingModel) -> ClassifierAdapter {
    ClassifierAdapter::new(
        Box::new(model.clone()),
        Box::new(NoDetection),
        LanguageCode::english(),
    )
}

pub fn indexed(title: &str, labels: &[&str]) -> IndexedMovie {
    IndexedMovie {
        title: title.to_string(),
        emotions: labels.iter().map(|label| EmotionLabel::from(*label)).collect(),
    }
}
