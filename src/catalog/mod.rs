//! Movie catalog: row types, genre-field parsing and CSV persistence.
pub mod genres;
pub mod io;
pub mod record;

pub use genres::parse_genre_field;
pub use io::{
    CatalogError, load_catalog, load_index_source, read_catalog, read_index_source,
    save_enriched, write_enriched,
};
pub use record::{
    Catalog, EmotionBreakdown, EnrichedCatalog, EnrichedMovie, IndexedMovie, MovieRecord,
};
