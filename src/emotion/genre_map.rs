//! Static genre → emotion table.
//!
//! Keys are TMDB genre names. Each genre maps to a short ordered list of
//! taxonomy labels.

/// Genre table, in TMDB genre-name order.
pub const GENRE_EMOTIONS: &[(&str, &[&str])] = &[
    ("Action", &["excitation", "colère"]),
    ("Adventure", &["excitation", "joie"]),
    ("Animation", &["joie", "amusement"]),
    ("Comedy", &["joie", "amusement"]),
    ("Crime", &["tension", "stress"]),
    ("Documentary", &["curiosité", "réflexion"]),
    ("Drama", &["tristesse", "réflexion"]),
    ("Family", &["joie", "sérénité"]),
    ("Fantasy", &["émerveillement", "joie"]),
    ("History", &["réflexion", "nostalgie"]),
    ("Horror", &["peur", "tension"]),
    ("Music", &["joie", "enthousiasme"]),
    ("Mystery", &["curiosité", "tension"]),
    ("Romance", &["amour", "nostalgie"]),
    ("Science Fiction", &["émerveillement", "excitation"]),
    ("TV Movie", &["divertissement", "joie"]),
    ("Thriller", &["tension", "stress"]),
    ("War", &["colère", "tristesse"]),
    ("Western", &["aventure", "réflexion"]),
];

/// Emotions associated with one genre tag, matched case-insensitively.
/// Unknown genres return `None`.
#[must_use]
pub fn emotions_for_genre(genre: &str) -> Option<&'static [&'static str]> {
    let genre = genre.trim();
    GENRE_EMOTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(genre))
        .map(|(_, emotions)| *emotions)
}
