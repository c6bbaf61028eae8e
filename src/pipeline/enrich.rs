//! Offline enrichment of the whole catalog.
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::aggregate::EmotionAggregator;
use crate::catalog::{
    self, Catalog, CatalogError, EnrichedCatalog, EnrichedMovie, MovieRecord, parse_genre_field,
};
use crate::observability::metrics::Metrics;

/// Rows between two progress log lines.
pub const PROGRESS_INTERVAL: usize = 250;

/// Drives the aggregator over every catalog row.
#[derive(Debug, Clone)]
pub struct EnrichmentPipeline {
    aggregator: EmotionAggregator,
    metrics: Option<Metrics>,
}

/// Counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub rows: usize,
    pub unlabeled: usize,
    pub label_distribution: HashMap<String, usize>,
}

impl EnrichmentPipeline {
    #[must_use]
    pub fn new(aggregator: EmotionAggregator) -> Self {
        Self {
            aggregator,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Derives the emotion set of one row. Never fails: a malformed genre
    /// field is an empty genre list and text failures contribute nothing.
    #[must_use]
    pub fn enrich_movie(&self, movie: MovieRecord) -> EnrichedMovie {
        let genres = parse_genre_field(&movie.genres);
        let breakdown = self
            .aggregator
            .breakdown(&genres, &movie.overview, &movie.tagline);
        let emotions = breakdown.merged();

        EnrichedMovie {
            movie,
            genres,
            breakdown,
            emotions,
        }
    }

    /// Enriches every row sequentially. Output order equals input order.
    #[must_use]
    pub fn enrich(&self, catalog: Catalog) -> (EnrichedCatalog, EnrichmentSummary) {
        let (columns, movies) = catalog.into_parts();
        let total = movies.len();
        info!(rows = total, "starting catalog enrichment");

        let mut summary = EnrichmentSummary::default();
        let mut enriched = Vec::with_capacity(total);

        for movie in movies {
            let movie = self.enrich_movie(movie);
            summary.rows += 1;

            if movie.emotions.is_empty() {
                summary.unlabeled += 1;
                debug!(title = %movie.movie.title, "movie received no emotion");
                if let Some(metrics) = &self.metrics {
                    metrics.unlabeled_rows.inc();
                }
            }
            for label in &movie.emotions {
                *summary
                    .label_distribution
                    .entry(label.lookup_key())
                    .or_insert(0) += 1;
            }
            if let Some(metrics) = &self.metrics {
                metrics.enriched_rows.inc();
            }
            if summary.rows % PROGRESS_INTERVAL == 0 {
                info!(done = summary.rows, total, "enrichment progress");
            }

            enriched.push(movie);
        }

        info!(
            rows = summary.rows,
            unlabeled = summary.unlabeled,
            labels = summary.label_distribution.len(),
            label_distribution = ?summary.label_distribution,
            "completed catalog enrichment"
        );

        (
            EnrichedCatalog {
                columns,
                movies: enriched,
            },
            summary,
        )
    }

    /// Loads `input`, enriches it and persists the result at `output`.
    pub fn run(&self, input: &Path, output: &Path) -> Result<EnrichmentSummary, CatalogError> {
        let catalog = catalog::load_catalog(input)?;
        let (enriched, summary) = self.enrich(catalog);
        catalog::save_enriched(output, &enriched)?;
        Ok(summary)
    }
}
