//! Keyword lexicon emotion model.
//!
//! Emits the seven labels of the English emotion model. Keyword hits are
//! weighted per label and normalized together with a fixed neutral prior, so
//! text without any hit is fully `neutral` and scores always sum to 1.
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use unicode_normalization::UnicodeNormalization;

use super::{ClassificationResult, EmotionModel, ModelError};

/// Output vocabulary, in the model's own order.
pub const LABELS: [&str; 7] = [
    "anger", "disgust", "fear", "joy", "neutral", "sadness", "surprise",
];

const NEUTRAL_INDEX: usize = 4;

/// Evidence mass always assigned to `neutral`.
const NEUTRAL_PRIOR: f32 = 0.5;

/// `(label, weight, phrases)`. Phrases are matched on lowercase NFKC text at
/// word boundaries.
const LEXICON: &[(&str, u16, &[&str])] = &[
    (
        "joy",
        1,
        &[
            "happy", "happiness", "joy", "joyful", "glad", "great", "wonderful", "awesome",
            "delighted", "cheerful", "fun", "smile", "smiling", "laugh", "laughing", "fantastic",
            "good day", "lovely", "enjoy", "enjoyed", "proud", "relieved", "heureux", "heureuse",
            "joie", "content", "contente", "génial", "super", "ravi", "ravie",
        ],
    ),
    ("joy", 2, &["thrilled", "ecstatic", "overjoyed", "so happy", "best day"]),
    (
        "sadness",
        1,
        &[
            "sad", "unhappy", "down", "lonely", "alone", "cry", "crying", "cried", "tears",
            "miserable", "grief", "gloomy", "hopeless", "miss", "missing", "lost", "hurt",
            "triste", "pleurer", "pleure", "seul", "seule", "malheureux", "malheureuse",
        ],
    ),
    (
        "sadness",
        2,
        &["depressed", "heartbroken", "devastated", "déprimé", "déprimée"],
    ),
    (
        "anger",
        1,
        &[
            "angry", "mad", "annoyed", "irritated", "hate", "frustrated", "frustrating",
            "unfair", "pissed", "énervé", "énervée", "fâché", "fâchée", "colère",
        ],
    ),
    ("anger", 2, &["furious", "rage", "outraged", "furieux", "furieuse"]),
    (
        "fear",
        1,
        &[
            "afraid", "scared", "fear", "anxious", "worried", "worry", "nervous", "frightened",
            "dread", "uneasy", "peur", "inquiet", "inquiète", "angoissé", "angoissée", "stressé",
            "stressée",
        ],
    ),
    ("fear", 2, &["terrified", "panic", "horrified", "terrifié", "terrifiée"]),
    (
        "surprise",
        1,
        &[
            "surprised", "surprise", "unexpected", "wow", "astonished", "amazed", "suddenly",
            "can't believe", "cannot believe", "surpris", "incroyable",
        ],
    ),
    ("surprise", 2, &["shocked", "stunned", "choqué", "choquée"]),
    (
        "disgust",
        1,
        &[
            "gross", "nasty", "yuck", "sick of", "fed up", "dégoût", "beurk", "marre",
        ],
    ),
    (
        "disgust",
        2,
        &["disgusted", "disgusting", "revolting", "dégoûté", "dégoûtée", "dégoûtant"],
    ),
];

#[derive(Debug, Clone, Copy)]
struct KeywordEntry {
    label: usize,
    weight: u16,
}

/// Deterministic keyword model.
#[derive(Debug)]
pub struct LexiconModel {
    matcher: AhoCorasick,
    entries: Vec<KeywordEntry>,
}

impl LexiconModel {
    pub fn new() -> Result<Self, ModelError> {
        let mut patterns = Vec::new();
        let mut entries = Vec::new();
        for (label, weight, phrases) in LEXICON {
            let label = LABELS
                .iter()
                .position(|known| known == label)
                .ok_or_else(|| ModelError::Unavailable(format!("unknown lexicon label {label}")))?;
            for phrase in *phrases {
                patterns.push(normalize(phrase));
                entries.push(KeywordEntry {
                    label,
                    weight: *weight,
                });
            }
        }

        let matcher = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|error| ModelError::Unavailable(error.to_string()))?;

        Ok(Self { matcher, entries })
    }

    fn evidence(&self, text: &str) -> [f32; LABELS.len()] {
        let normalized = normalize(text);
        let mut evidence = [0.0_f32; LABELS.len()];
        for hit in self.matcher.find_iter(&normalized) {
            if !at_word_boundary(&normalized, hit.start(), hit.end()) {
                continue;
            }
            let entry = self.entries[hit.pattern().as_usize()];
            evidence[entry.label] += f32::from(entry.weight);
        }
        evidence
    }
}

impl EmotionModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn predict(&self, text: &str) -> Result<Vec<ClassificationResult>, ModelError> {
        let mut evidence = self.evidence(text);
        evidence[NEUTRAL_INDEX] += NEUTRAL_PRIOR;
        let total: f32 = evidence.iter().sum();

        Ok(LABELS
            .iter()
            .zip(evidence)
            .map(|(label, mass)| ClassificationResult::new(*label, mass / total))
            .collect())
    }
}

fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase().replace('’', "'")
}

fn at_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
