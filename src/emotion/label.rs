//! Emotion labels and the textual list format used in the enriched catalog.
//!
//! Format `v1` is a bracketed, comma-separated list of quoted labels, e.g.
//! `['joie', 'amour']`. A label containing a single quote and no double
//! quote is written with double quotes instead. Inside quotes a backslash
//! escapes the next character; the writer escapes backslashes and, for a
//! label holding both quote kinds, the single quote. Parsing is lenient:
//! surrounding brackets, either quote style and bare (unquoted) labels are
//! all accepted.
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::taxonomy::glyph_for;

/// Version marker written next to every persisted emotion list.
pub const EMOTION_LIST_FORMAT: &str = "v1";

/// One emotion label. The vocabulary is open; any non-empty string is valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionLabel(String);

impl EmotionLabel {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.len() == raw.len() {
            Self(raw)
        } else {
            Self(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for index lookups. Labels are stored verbatim and only
    /// lowercased when compared.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn glyph(&self) -> &'static str {
        glyph_for(&self.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmotionLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EmotionLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EmotionLabel {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Derived emotion set of a catalog item. Ordered so the persisted artifact
/// is deterministic.
pub type EmotionSet = BTreeSet<EmotionLabel>;

/// Serializes labels into the `v1` list form. Also used for the other
/// list-valued catalog columns (genre names, per-source labels).
#[must_use]
pub fn format_emotion_list<I>(labels: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let items: Vec<String> = labels
        .into_iter()
        .map(|label| {
            let raw = label.as_ref();
            let quote = if raw.contains('\'') && !raw.contains('"') {
                '"'
            } else {
                '\''
            };
            quoted(raw, quote)
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn quoted(raw: &str, quote: char) -> String {
    let mut token = String::with_capacity(raw.len() + 2);
    token.push(quote);
    for c in raw.chars() {
        if c == '\\' || c == quote {
            token.push('\\');
        }
        token.push(c);
    }
    token.push(quote);
    token
}

/// Parses a list written by [`format_emotion_list`] (or anything close to it).
///
/// Never fails: unparsable fragments are dropped and an unusable field yields
/// an empty set.
#[must_use]
pub fn parse_emotion_list(raw: &str) -> EmotionSet {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix('[') {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix(']') {
        body = rest;
    }

    let mut labels = EmotionSet::new();
    let mut chars = body.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch == ',' || ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token: String = if ch == '\'' || ch == '"' {
            chars.next();
            let mut token = String::new();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => token.extend(chars.next()),
                    c if c == ch => break,
                    c => token.push(c),
                }
            }
            token
        } else {
            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                token.push(c);
                chars.next();
            }
            token.trim_matches(|c: char| c == '\'' || c == '"').to_string()
        };

        let label = EmotionLabel::new(token);
        if !label.is_empty() {
            labels.insert(label);
        }
    }
    labels
}
