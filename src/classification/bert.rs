//! `rust-bert` sequence-classification model loaded from local files.
//!
//! The directory must hold a converted RoBERTa emotion checkpoint:
//! `rust_model.ot`, `config.json`, `vocab.json` and `merges.txt`.
use std::path::Path;
use std::sync::Mutex;

use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::sequence_classification::{
    SequenceClassificationConfig, SequenceClassificationModel,
};
use rust_bert::resources::LocalResource;
use tracing::info;

use super::{ClassificationResult, EmotionModel, ModelError};

/// Torch-backed emotion classifier. Inference is serialized behind a mutex.
pub struct BertEmotionModel {
    model: Mutex<SequenceClassificationModel>,
}

impl std::fmt::Debug for BertEmotionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmotionModel")
            .field("model", &"<SequenceClassificationModel>")
            .finish()
    }
}

impl BertEmotionModel {
    /// Loads the model. Slow; call once at startup.
    pub fn from_dir(dir: &Path) -> Result<Self, ModelError> {
        let resource = |name: &str| LocalResource::from(dir.join(name));
        let config = SequenceClassificationConfig::new(
            ModelType::Roberta,
            ModelResource::Torch(Box::new(resource("rust_model.ot"))),
            resource("config.json"),
            resource("vocab.json"),
            Some(resource("merges.txt")),
            false,
            None,
            None,
        );

        let model = SequenceClassificationModel::new(config)
            .map_err(|error| ModelError::Unavailable(error.to_string()))?;

        info!(dir = %dir.display(), "loaded rust-bert emotion model");
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl EmotionModel for BertEmotionModel {
    fn name(&self) -> &str {
        "rust-bert"
    }

    fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError> {
        let model = self
            .model
            .lock()
            .map_err(|_| ModelError::Unavailable("model mutex poisoned".into()))?;
        let labels = model
            .predict_multilabel(&[text], 0.0)
            .map_err(|error| ModelError::Unavailable(error.to_string()))?;

        Ok(labels
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|label| ClassificationResult::new(label.text, label.score as f32))
            .collect())
    }
}
