//! Inverted emotion index.
use std::collections::{BTreeSet, HashMap};

use tracing::info;

use crate::catalog::IndexedMovie;
use crate::emotion::EmotionLabel;

/// Lowercased label → titles, in catalog order. Built once, read-only after.
#[derive(Debug, Clone, Default)]
pub struct EmotionIndex {
    buckets: HashMap<String, Vec<String>>,
    movies: usize,
}

impl EmotionIndex {
    /// Appends every movie to the bucket of each of its labels. Labels that
    /// differ only by case share one bucket and file the movie once.
    pub fn build<'a, I>(movies: I) -> Self
    where
        I: IntoIterator<Item = &'a IndexedMovie>,
    {
        let mut index = Self::default();
        for movie in movies {
            index.movies += 1;
            let keys: BTreeSet<String> = movie
                .emotions
                .iter()
                .map(EmotionLabel::lookup_key)
                .collect();
            for key in keys {
                index
                    .buckets
                    .entry(key)
                    .or_default()
                    .push(movie.title.clone());
            }
        }
        info!(
            movies = index.movies,
            labels = index.buckets.len(),
            "built emotion index"
        );
        index
    }

    /// Titles filed under `label`, compared case-insensitively.
    #[must_use]
    pub fn lookup(&self, label: &EmotionLabel) -> Option<&[String]> {
        self.buckets.get(&label.lookup_key()).map(Vec::as_slice)
    }

    /// `(label, bucket size)` pairs sorted by label.
    #[must_use]
    pub fn labels(&self) -> Vec<(&str, usize)> {
        let mut labels: Vec<_> = self
            .buckets
            .iter()
            .map(|(label, titles)| (label.as_str(), titles.len()))
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Movies the index was built from, labeled or not.
    #[must_use]
    pub fn movie_count(&self) -> usize {
        self.movies
    }
}
