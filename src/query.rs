//! Online query path: utterance → dominant emotion → recommended titles.
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, info};

use crate::classification::ClassifierAdapter;
use crate::emotion::EmotionLabel;
use crate::index::EmotionIndex;
use crate::observability::metrics::Metrics;

/// Maximum number of titles per answer by default.
pub const DEFAULT_RECOMMEND_LIMIT: usize = 10;

/// Shown instead of titles when the emotion has no bucket.
pub const NO_MATCH_LINE: &str = "Aucun film trouvé";

/// Opening line of a chat session.
pub const GREETING: &str = "Salut ! Comment s'est passée ta journée ? / Hey, how was your day?";

/// Titles for one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendations {
    /// First entries of the matched bucket, in index order.
    Found(Vec<String>),
    /// The emotion has no bucket in the index.
    NoMatch,
}

impl Recommendations {
    #[must_use]
    pub fn titles(&self) -> &[String] {
        match self {
            Self::Found(titles) => titles,
            Self::NoMatch => &[],
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub emotion: EmotionLabel,
    pub confidence: f32,
    pub glyph: &'static str,
    pub recommendations: Recommendations,
}

/// Answers utterances against a fixed index.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    adapter: Arc<ClassifierAdapter>,
    index: Arc<EmotionIndex>,
    limit: usize,
    metrics: Option<Metrics>,
}

impl QueryEngine {
    #[must_use]
    pub fn new(adapter: Arc<ClassifierAdapter>, index: Arc<EmotionIndex>) -> Self {
        Self {
            adapter,
            index,
            limit: DEFAULT_RECOMMEND_LIMIT,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn index(&self) -> &EmotionIndex {
        &self.index
    }

    /// Answers one utterance. Blank input produces no answer and does not
    /// reach the classifier.
    #[must_use]
    pub fn answer(&self, utterance: &str) -> Option<Answer> {
        if utterance.trim().is_empty() {
            return None;
        }

        let language = self.adapter.detect_language(utterance);
        let outcome = self.adapter.classify(utterance, &language);
        let dominant = outcome.dominant();

        let recommendations = match self.index.lookup(&dominant.label) {
            Some(titles) => Recommendations::Found(titles.iter().take(self.limit).cloned().collect()),
            None => Recommendations::NoMatch,
        };

        if let Some(metrics) = &self.metrics {
            metrics.queries_total.inc();
            if !recommendations.is_match() {
                metrics.query_misses.inc();
            }
        }
        debug!(
            language = %language,
            source = ?outcome.source(),
            "classified utterance"
        );
        info!(
            emotion = %dominant.label,
            confidence = dominant.score,
            matched = recommendations.is_match(),
            titles = recommendations.titles().len(),
            "answered utterance"
        );

        Some(Answer {
            glyph: dominant.label.glyph(),
            emotion: dominant.label.clone(),
            confidence: dominant.score,
            recommendations,
        })
    }
}

/// Plain-text bot message for one answer.
#[must_use]
pub fn render_reply(answer: &Answer) -> String {
    let mut reply = format!(
        "Je détecte que tu te sens {} {} (confiance: {:.2})\n\n",
        answer.emotion, answer.glyph, answer.confidence
    );
    match &answer.recommendations {
        Recommendations::Found(titles) => {
            reply.push_str("🎬 Films recommandés :");
            for title in titles {
                let _ = write!(reply, "\n - {title}");
            }
        }
        Recommendations::NoMatch => {
            let _ = write!(reply, "🎬 {NO_MATCH_LINE}");
        }
    }
    reply
}
