//! Emotion vocabulary: display taxonomy, label type and the genre table.

pub mod genre_map;
pub mod label;
pub mod taxonomy;

pub use genre_map::{GENRE_EMOTIONS, emotions_for_genre};
pub use label::{
    EMOTION_LIST_FORMAT, EmotionLabel, EmotionSet, format_emotion_list, parse_emotion_list,
};
pub use taxonomy::{DEFAULT_GLYPH, Emotion, FALLBACK_LABEL, glyph_for};
