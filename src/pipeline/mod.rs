//! Offline catalog enrichment.
pub mod aggregate;
pub mod enrich;

pub use aggregate::{DEFAULT_TEXT_TOP_K, EmotionAggregator, genres_to_emotions};
pub use enrich::{EnrichmentPipeline, EnrichmentSummary};
