//! Catalog row types, before and after enrichment.
use crate::emotion::{EmotionLabel, EmotionSet};

pub const TITLE_COLUMN: &str = "title";
pub const GENRES_COLUMN: &str = "genres";
pub const OVERVIEW_COLUMN: &str = "overview";
pub const TAGLINE_COLUMN: &str = "tagline";

pub const GENRES_LIST_COLUMN: &str = "genres_list";
pub const FROM_GENRES_COLUMN: &str = "emotions_from_genres";
pub const FROM_OVERVIEW_COLUMN: &str = "emotion_overview";
pub const FROM_TAGLINE_COLUMN: &str = "emotion_tagline";
pub const EMOTIONS_COLUMN: &str = "emotions_associees";
pub const FORMAT_COLUMN: &str = "emotions_format";

/// Columns appended by enrichment, in output order. They are dropped from an
/// input catalog so re-enriching an enriched file does not duplicate them.
pub const DERIVED_COLUMNS: [&str; 6] = [
    GENRES_LIST_COLUMN,
    FROM_GENRES_COLUMN,
    FROM_OVERVIEW_COLUMN,
    FROM_TAGLINE_COLUMN,
    EMOTIONS_COLUMN,
    FORMAT_COLUMN,
];

/// One movie of the raw catalog.
///
/// The four fields used by enrichment are lifted out; every other input
/// column is carried through untouched in `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub title: String,
    pub genres: String,
    pub overview: String,
    pub tagline: String,
    values: Vec<String>,
}

impl MovieRecord {
    /// Record with only the standard columns.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        genres: impl Into<String>,
        overview: impl Into<String>,
        tagline: impl Into<String>,
    ) -> Self {
        let (title, genres, overview, tagline) =
            (title.into(), genres.into(), overview.into(), tagline.into());
        let values = vec![
            title.clone(),
            genres.clone(),
            overview.clone(),
            tagline.clone(),
        ];
        Self {
            title,
            genres,
            overview,
            tagline,
            values,
        }
    }

    pub(crate) fn from_parts(
        title: String,
        genres: String,
        overview: String,
        tagline: String,
        values: Vec<String>,
    ) -> Self {
        Self {
            title,
            genres,
            overview,
            tagline,
            values,
        }
    }

    /// Pass-through column values, aligned with [`Catalog::columns`].
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Raw catalog in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    columns: Vec<String>,
    movies: Vec<MovieRecord>,
}

impl Catalog {
    /// Catalog of records built with [`MovieRecord::new`].
    #[must_use]
    pub fn from_movies(movies: Vec<MovieRecord>) -> Self {
        let columns = [TITLE_COLUMN, GENRES_COLUMN, OVERVIEW_COLUMN, TAGLINE_COLUMN]
            .map(str::to_string)
            .to_vec();
        Self { columns, movies }
    }

    pub(crate) fn with_columns(columns: Vec<String>, movies: Vec<MovieRecord>) -> Self {
        Self { columns, movies }
    }

    /// Names of the pass-through columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<MovieRecord>) {
        (self.columns, self.movies)
    }
}

/// Labels contributed by each signal of one movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionBreakdown {
    /// Concatenated genre-table entries; may repeat.
    pub from_genres: Vec<EmotionLabel>,
    pub from_overview: Vec<EmotionLabel>,
    pub from_tagline: Vec<EmotionLabel>,
}

impl EmotionBreakdown {
    /// Union of all three sources.
    #[must_use]
    pub fn merged(&self) -> EmotionSet {
        self.from_genres
            .iter()
            .chain(&self.from_overview)
            .chain(&self.from_tagline)
            .cloned()
            .collect()
    }
}

/// A movie together with its derived emotions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMovie {
    pub movie: MovieRecord,
    pub genres: Vec<String>,
    pub breakdown: EmotionBreakdown,
    pub emotions: EmotionSet,
}

/// Enrichment output: the input columns plus [`DERIVED_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedCatalog {
    pub columns: Vec<String>,
    pub movies: Vec<EnrichedMovie>,
}

impl EnrichedCatalog {
    /// Movies whose emotion set is empty; none of them can be recommended.
    #[must_use]
    pub fn unlabeled(&self) -> usize {
        self.movies
            .iter()
            .filter(|movie| movie.emotions.is_empty())
            .count()
    }
}

/// The two fields the index is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedMovie {
    pub title: String,
    pub emotions: EmotionSet,
}

impl From<&EnrichedMovie> for IndexedMovie {
    fn from(movie: &EnrichedMovie) -> Self {
        Self {
            title: movie.movie.title.clone(),
            emotions: movie.emotions.clone(),
        }
    }
}
