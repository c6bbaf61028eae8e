use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::{
    api,
    catalog::{self, IndexedMovie},
    classification::{ClassifierAdapter, EmotionModel, LexiconModel},
    clients::{InferenceClient, InferenceClientConfig, LibreTranslateClient, LibreTranslateConfig},
    config::{ClassifierBackend, Config},
    index::EmotionIndex,
    language::LinguaDetector,
    observability::Telemetry,
    pipeline::{EmotionAggregator, EnrichmentPipeline},
    query::QueryEngine,
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

impl AppState {
    pub(crate) fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self { registry }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn engine(&self) -> &QueryEngine {
        &self.registry.engine
    }
}

/// Process-wide components of the query side. Built once before the first
/// query and read-only afterwards.
#[derive(Debug)]
pub struct ComponentRegistry {
    config: Arc<Config>,
    telemetry: Telemetry,
    engine: QueryEngine,
}

impl ComponentRegistry {
    /// Loads the classifier and the enriched catalog, then builds the index.
    ///
    /// # Errors
    /// Fails when telemetry, a classifier backend or the catalog cannot be
    /// initialized.
    pub fn build(config: Config) -> Result<Self> {
        let telemetry = Telemetry::new()?;
        let adapter = build_classifier(&config, &telemetry)?;
        let movies = catalog::load_index_source(config.catalog_path()).with_context(|| {
            format!(
                "failed to load enriched catalog {}",
                config.catalog_path().display()
            )
        })?;
        Ok(Self::from_parts(config, telemetry, adapter, &movies))
    }

    /// Assembles a registry from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: Config,
        telemetry: Telemetry,
        adapter: ClassifierAdapter,
        movies: &[IndexedMovie],
    ) -> Self {
        let index = EmotionIndex::build(movies);
        let engine = QueryEngine::new(Arc::new(adapter), Arc::new(index))
            .with_limit(config.recommend_limit().get())
            .with_metrics(telemetry.metrics().clone());

        Self {
            config: Arc::new(config),
            telemetry,
            engine,
        }
    }

    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    #[must_use]
    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    #[must_use]
    pub fn index(&self) -> &EmotionIndex {
        self.engine.index()
    }
}

pub fn build_router(registry: Arc<ComponentRegistry>) -> Router {
    let state = AppState::new(registry);
    api::router(state)
}

/// Builds the classifier adapter for the configured backend, with language
/// detection and, when configured, translation.
///
/// # Errors
/// Fails when the backend or a client cannot be constructed.
pub fn build_classifier(config: &Config, telemetry: &Telemetry) -> Result<ClassifierAdapter> {
    let model = build_model(config.classifier())?;
    let detector = LinguaDetector::new(config.lang_detect_min_confidence());

    let mut adapter = ClassifierAdapter::new(
        model,
        Box::new(detector),
        config.native_language().clone(),
    )
    .with_metrics(telemetry.metrics().clone());

    if let Some(translation) = config.translation() {
        let client = LibreTranslateClient::new(LibreTranslateConfig {
            base_url: translation.base_url.clone(),
            api_key: translation.api_key.clone(),
            source_languages: translation.source_languages.clone(),
            timeout: translation.timeout,
        })?;
        adapter = adapter.with_translator(Box::new(client));
    }

    info!(
        backend = config.classifier().name(),
        native = %config.native_language(),
        translation = config.translation().is_some(),
        "classifier ready"
    );
    Ok(adapter)
}

/// Enrichment pipeline over the configured classifier.
///
/// # Errors
/// Fails when the classifier cannot be built.
pub fn build_enrichment_pipeline(config: &Config, telemetry: &Telemetry) -> Result<EnrichmentPipeline> {
    let adapter = build_classifier(config, telemetry)?;
    let aggregator =
        EmotionAggregator::new(Arc::new(adapter)).with_top_k(config.text_top_k().get());
    Ok(EnrichmentPipeline::new(aggregator).with_metrics(telemetry.metrics().clone()))
}

fn build_model(backend: &ClassifierBackend) -> Result<Box<dyn EmotionModel>> {
    match backend {
        ClassifierBackend::Lexicon => Ok(Box::new(
            LexiconModel::new().context("failed to build keyword lexicon")?,
        )),
        ClassifierBackend::Remote {
            url,
            token,
            timeout,
        } => Ok(Box::new(InferenceClient::new(InferenceClientConfig {
            url: url.clone(),
            token: token.clone(),
            timeout: *timeout,
        })?)),
        ClassifierBackend::Bert { model_dir } => build_bert(model_dir),
    }
}

#[cfg(feature = "bert")]
fn build_bert(model_dir: &std::path::Path) -> Result<Box<dyn EmotionModel>> {
    let model = crate::classification::bert::BertEmotionModel::from_dir(model_dir)
        .with_context(|| format!("failed to load model from {}", model_dir.display()))?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "bert"))]
fn build_bert(model_dir: &std::path::Path) -> Result<Box<dyn EmotionModel>> {
    anyhow::bail!(
        "classifier backend `bert` ({}) requires building with the `bert` feature",
        model_dir.display()
    )
}
