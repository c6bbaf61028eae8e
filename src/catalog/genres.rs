//! Parsing of the TMDB `genres` column.
//!
//! The column holds a list of objects such as
//! `[{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]`, written
//! either as JSON or as a Python literal with single-quoted strings.
use serde::Deserialize;
use tracing::trace;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenreEntry {
    Named { name: String },
    Plain(String),
}

impl GenreEntry {
    fn into_name(self) -> String {
        match self {
            Self::Named { name } | Self::Plain(name) => name,
        }
    }
}

/// Extracts genre names in field order. Blank or malformed fields yield an
/// empty list.
#[must_use]
pub fn parse_genre_field(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let entries = serde_json::from_str::<Vec<GenreEntry>>(raw).or_else(|_| {
        python_literal_to_json(raw)
            .ok_or(())
            .and_then(|json| serde_json::from_str::<Vec<GenreEntry>>(&json).map_err(|_| ()))
    });

    match entries {
        Ok(entries) => entries
            .into_iter()
            .map(GenreEntry::into_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        Err(()) => {
            trace!(field = raw, "unparsable genre field");
            Vec::new()
        }
    }
}

/// Rewrites single-quoted string literals into JSON strings. Returns `None`
/// when a string literal is left open.
fn python_literal_to_json(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                out.push('"');
                loop {
                    match chars.next()? {
                        '\'' => break,
                        '\\' => match chars.next()? {
                            '\'' => out.push('\''),
                            escaped => {
                                out.push('\\');
                                out.push(escaped);
                            }
                        },
                        '"' => out.push_str("\\\""),
                        other => out.push(other),
                    }
                }
                out.push('"');
            }
            '"' => {
                out.push('"');
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => {
                            out.push('\\');
                            out.push(chars.next()?);
                        }
                        other => out.push(other),
                    }
                }
                out.push('"');
            }
            other => out.push(other),
        }
    }

    Some(out)
}
