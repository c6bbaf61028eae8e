//! Display taxonomy for emotion labels.
//!
//! The taxonomy is a hint set for presentation only. Labels outside of it are
//! still valid everywhere else in the system and simply render with
//! [`DEFAULT_GLYPH`].

/// Glyph used for any label the taxonomy does not enumerate.
pub const DEFAULT_GLYPH: &str = "😐";

/// Label reported when classification is skipped or unavailable.
pub const FALLBACK_LABEL: &str = "neutre";

/// Known emotion labels.
///
/// The French labels come from the genre table; the English ones are the
/// output vocabulary of the English emotion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joie,
    Tristesse,
    Colere,
    Peur,
    Reflexion,
    Amusement,
    Excitation,
    Tension,
    Stress,
    Curiosite,
    Serenite,
    Amour,
    Nostalgie,
    Divertissement,
    Emerveillement,
    Enthousiasme,
    Aventure,
    Neutre,
    Degout,
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 26] = [
        Emotion::Joie,
        Emotion::Tristesse,
        Emotion::Colere,
        Emotion::Peur,
        Emotion::Reflexion,
        Emotion::Amusement,
        Emotion::Excitation,
        Emotion::Tension,
        Emotion::Stress,
        Emotion::Curiosite,
        Emotion::Serenite,
        Emotion::Amour,
        Emotion::Nostalgie,
        Emotion::Divertissement,
        Emotion::Emerveillement,
        Emotion::Enthousiasme,
        Emotion::Aventure,
        Emotion::Neutre,
        Emotion::Degout,
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    /// Canonical lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Emotion::Joie => "joie",
            Emotion::Tristesse => "tristesse",
            Emotion::Colere => "colère",
            Emotion::Peur => "peur",
            Emotion::Reflexion => "réflexion",
            Emotion::Amusement => "amusement",
            Emotion::Excitation => "excitation",
            Emotion::Tension => "tension",
            Emotion::Stress => "stress",
            Emotion::Curiosite => "curiosité",
            Emotion::Serenite => "sérénité",
            Emotion::Amour => "amour",
            Emotion::Nostalgie => "nostalgie",
            Emotion::Divertissement => "divertissement",
            Emotion::Emerveillement => "émerveillement",
            Emotion::Enthousiasme => "enthousiasme",
            Emotion::Aventure => "aventure",
            Emotion::Neutre => "neutre",
            Emotion::Degout => "dégoût",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Emotion::Joie | Emotion::Joy => "😄",
            Emotion::Tristesse | Emotion::Sadness => "😢",
            Emotion::Colere | Emotion::Anger => "😡",
            Emotion::Peur | Emotion::Fear => "😱",
            Emotion::Reflexion => "🤔",
            Emotion::Amusement => "😂",
            Emotion::Excitation => "🤩",
            Emotion::Tension => "😬",
            Emotion::Stress => "😣",
            Emotion::Curiosite => "🧐",
            Emotion::Serenite => "😌",
            Emotion::Amour => "😍",
            Emotion::Nostalgie => "😔",
            Emotion::Divertissement => "🎉",
            Emotion::Emerveillement => "✨",
            Emotion::Enthousiasme => "😁",
            Emotion::Aventure => "🏕️",
            Emotion::Neutre | Emotion::Neutral => "😐",
            Emotion::Degout | Emotion::Disgust => "🤢",
            Emotion::Surprise => "😲",
        }
    }

    /// Resolves a label case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|emotion| emotion.label() == key)
    }
}

/// Glyph for any label, known or not.
#[must_use]
pub fn glyph_for(label: &str) -> &'static str {
    Emotion::from_label(label).map_or(DEFAULT_GLYPH, Emotion::glyph)
}
