//! Multi-signal emotion aggregation for one catalog item.
use std::sync::Arc;

use crate::catalog::EmotionBreakdown;
use crate::classification::ClassifierAdapter;
use crate::emotion::{EmotionLabel, EmotionSet, emotions_for_genre};

/// Labels taken from each text field by default.
pub const DEFAULT_TEXT_TOP_K: usize = 2;

/// Genre-table labels for `genres`, concatenated in genre order. Unknown
/// genres contribute nothing.
#[must_use]
pub fn genres_to_emotions<S: AsRef<str>>(genres: &[S]) -> Vec<EmotionLabel> {
    genres
        .iter()
        .filter_map(|genre| emotions_for_genre(genre.as_ref()))
        .flatten()
        .map(|label| EmotionLabel::from(*label))
        .collect()
}

/// Combines genre-derived and text-derived labels.
#[derive(Debug, Clone)]
pub struct EmotionAggregator {
    adapter: Arc<ClassifierAdapter>,
    top_k: usize,
}

impl EmotionAggregator {
    #[must_use]
    pub fn new(adapter: Arc<ClassifierAdapter>) -> Self {
        Self {
            adapter,
            top_k: DEFAULT_TEXT_TOP_K,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Labels of the best `top_k` classifier results for `text`. Blank text
    /// and classifier failures give an empty list, never the neutral fallback.
    #[must_use]
    pub fn text_to_emotions(&self, text: &str) -> Vec<EmotionLabel> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.adapter.classify_text(text).top_labels(self.top_k)
    }

    /// Per-source labels of one item.
    #[must_use]
    pub fn breakdown<S: AsRef<str>>(
        &self,
        genres: &[S],
        overview: &str,
        tagline: &str,
    ) -> EmotionBreakdown {
        EmotionBreakdown {
            from_genres: genres_to_emotions(genres),
            from_overview: self.text_to_emotions(overview),
            from_tagline: self.text_to_emotions(tagline),
        }
    }

    /// Union of genre labels with the top labels of both text fields.
    #[must_use]
    pub fn aggregate<S: AsRef<str>>(&self, genres: &[S], overview: &str, tagline: &str) -> EmotionSet {
        self.breakdown(genres, overview, tagline).merged()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::classification::{ClassificationResult, EmotionModel, ModelError};
    use crate::emotion::GENRE_EMOTIONS;
    use crate::language::{DetectError, LanguageCode, LanguageDetector};
    use proptest::prelude::*;

    struct KeywordModel {
        calls: Arc<Mutex<usize>>,
    }

    impl EmotionModel for KeywordModel {
        fn name(&self) -> &str {
            "keyword"
        }

        fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError> {
            *self.calls.lock().unwrap() += 1;
            if text.contains("boom") {
                return Err(ModelError::Unavailable("boom".into()));
            }
            Ok(vec![
                ClassificationResult::new("neutral", 0.1),
                ClassificationResult::new("fear", 0.6),
                ClassificationResult::new("surprise", 0.3),
            ])
        }
    }

    struct English;

    impl LanguageDetector for English {
        fn detect(&self, _text: &str) -> Result<LanguageCode, DetectError> {
            Ok(LanguageCode::english())
        }
    }

    fn aggregator() -> (EmotionAggregator, Arc<Mutex<usize>>) {
        let calls = Arc::new(Mutex::new(0));
        let adapter = ClassifierAdapter::new(
            Box::new(KeywordModel {
                calls: Arc::clone(&calls),
            }),
            Box::new(English),
            LanguageCode::english(),
        );
        (EmotionAggregator::new(Arc::new(adapter)), calls)
    }

    fn labels(set: &EmotionSet) -> Vec<&str> {
        set.iter().map(EmotionLabel::as_str).collect()
    }

    #[test]
    fn genres_concatenate_and_skip_unknown() {
        let emotions = genres_to_emotions(&["Horror", "Cooking", "Thriller"]);
        let emotions: Vec<_> = emotions.iter().map(EmotionLabel::as_str).collect();
        assert_eq!(emotions, ["peur", "tension", "tension", "stress"]);
    }

    #[test]
    fn blank_text_fields_contribute_nothing() {
        let (aggregator, calls) = aggregator();
        let set = aggregator.aggregate(&["Comedy"], "", "  ");
        assert_eq!(labels(&set), ["amusement", "joie"]);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn text_fields_contribute_their_top_two() {
        let (aggregator, _) = aggregator();
        let set = aggregator.aggregate(&["Horror"], "a haunted house", "");
        assert_eq!(labels(&set), ["fear", "peur", "surprise", "tension"]);
    }

    #[test]
    fn classifier_failure_contributes_nothing() {
        let (aggregator, calls) = aggregator();
        assert!(aggregator.text_to_emotions("boom").is_empty());
        let set = aggregator.aggregate::<&str>(&[], "boom", "boom");
        assert!(set.is_empty());
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[test]
    fn top_k_is_configurable() {
        let (aggregator, _) = aggregator();
        let aggregator = aggregator.with_top_k(1);
        let labels: Vec<_> = aggregator
            .text_to_emotions("dark")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, ["fear"]);
    }

    proptest! {
        #[test]
        fn genre_labels_come_from_the_table(picks in proptest::collection::vec(0usize..GENRE_EMOTIONS.len() + 3, 0..6)) {
            let genres: Vec<&str> = picks
                .iter()
                .map(|&i| GENRE_EMOTIONS.get(i).map_or("Unknown", |(genre, _)| *genre))
                .collect();
            let allowed: Vec<&str> = genres
                .iter()
                .filter_map(|genre| emotions_for_genre(genre))
                .flatten()
                .copied()
                .collect();
            for label in genres_to_emotions(&genres) {
                prop_assert!(allowed.contains(&label.as_str()));
            }
        }
    }
}
