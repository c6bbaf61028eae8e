/// Prometheus metrics.
use prometheus::{
    Counter, Histogram, HistogramOpts, Registry, register_counter_with_registry,
    register_histogram_with_registry,
};

/// Metric handles. Cloning shares the underlying collectors.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub queries_total: Counter,
    pub query_misses: Counter,
    pub classifier_fallbacks: Counter,
    pub enriched_rows: Counter,
    pub unlabeled_rows: Counter,

    pub classify_duration: Histogram,
}

impl Metrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            queries_total: register_counter_with_registry!(
                "mood_queries_total",
                "Total number of answered utterances",
                registry
            )?,
            query_misses: register_counter_with_registry!(
                "mood_query_misses_total",
                "Utterances whose emotion had no index bucket",
                registry
            )?,
            classifier_fallbacks: register_counter_with_registry!(
                "mood_classifier_fallbacks_total",
                "Classifications replaced by the neutral fallback after a failure",
                registry
            )?,
            enriched_rows: register_counter_with_registry!(
                "mood_enriched_rows_total",
                "Catalog rows processed by the enrichment pipeline",
                registry
            )?,
            unlabeled_rows: register_counter_with_registry!(
                "mood_unlabeled_rows_total",
                "Enriched catalog rows that received no emotion at all",
                registry
            )?,
            classify_duration: register_histogram_with_registry!(
                HistogramOpts::new(
                    "mood_classify_duration_seconds",
                    "Time spent in one classifier adapter call"
                )
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
                registry
            )?,
        })
    }

    /// Metrics bound to a private registry, for tests and one-off tools.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(&Registry::new()).unwrap_or_else(|error| {
            unreachable!("fresh registry cannot hold duplicate metrics: {error}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, TextEncoder};

    #[test]
    fn registers_on_a_fresh_registry() {
        let registry = Registry::new();
        let metrics = Metrics::new(&registry).expect("metrics register");
        metrics.queries_total.inc();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .expect("encode");
        let rendered = String::from_utf8(buffer).expect("utf8");
        assert!(rendered.contains("mood_queries_total 1"));
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        Metrics::new(&registry).expect("first registration");
        assert!(Metrics::new(&registry).is_err());
    }
}
