//! Label normalization
//!
//! Each input modality has its own raw label vocabulary:
//! - Face: facial-expression classifier labels (`happiness`, `fearful`, ...)
//! - Text: GoEmotions-style 28-class labels (`admiration`, `remorse`, ...)
//! - Speech: speech-emotion classifier labels (`angry`, `surprised`, ...)
//!
//! Every table is a total function onto the canonical set. Keys absent from a
//! table resolve to `Neutral`.

use serde::{Deserialize, Serialize};

use crate::CanonicalMood;

/// Input modality whose vocabulary a raw label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Face,
    Text,
    Speech,
}

/// Normalize a raw model label onto the canonical mood set
///
/// Case-insensitive and side-effect free. Never fails.
pub fn normalize(raw_label: &str, modality: Modality) -> CanonicalMood {
    let label = raw_label.trim().to_lowercase();
    match modality {
        Modality::Face => face_label(&label),
        Modality::Text => text_label(&label),
        Modality::Speech => speech_label(&label),
    }
}

fn face_label(label: &str) -> CanonicalMood {
    use CanonicalMood::*;
    match label {
        "happy" | "happiness" => Happy,
        "angry" | "anger" => Angry,
        "sad" | "sadness" => Sad,
        "calm" | "relaxed" => Calm,
        "energetic" => Energetic,
        "anxious" => Anxious,
        // Transient labels the canonical set has no slot for
        "disgust" => Angry,
        "fear" | "fearful" => Anxious,
        "surprise" | "surprised" => Energetic,
        _ => Neutral,
    }
}

fn speech_label(label: &str) -> CanonicalMood {
    use CanonicalMood::*;
    match label {
        "happy" | "hap" => Happy,
        "angry" | "anger" | "ang" => Angry,
        "sad" | "sadness" => Sad,
        "calm" => Calm,
        "fear" | "fearful" => Anxious,
        "disgust" => Angry,
        "surprise" | "surprised" => Energetic,
        _ => Neutral,
    }
}

fn text_label(label: &str) -> CanonicalMood {
    use CanonicalMood::*;
    match label {
        "joy" | "optimism" | "admiration" | "approval" | "gratitude" | "amusement" | "pride"
        | "love" | "happy" => Happy,

        "disappointment" | "sadness" | "grief" | "remorse" | "embarrassment" | "melancholy"
        | "sorrow" | "sad" => Sad,

        "anger" | "annoyance" | "frustration" | "irritation" | "rage" | "angry" => Angry,

        "fear" | "anxiety" | "nervousness" | "worry" | "stress" | "tension" | "anxious" => Anxious,

        "relief" | "peace" | "serenity" | "tranquility" | "relaxation" => Calm,

        "excitement" | "enthusiasm" | "energy" | "vigor" | "energetic" => Energetic,

        // The text vocabulary folds calm-adjacent and ambiguous labels into neutral
        "calm" | "relaxed" | "surprise" | "disgust" | "curiosity" | "realization" | "confusion"
        | "indifference" => Neutral,

        _ => Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_vocabulary() {
        assert_eq!(normalize("Happiness", Modality::Face), CanonicalMood::Happy);
        assert_eq!(normalize("fearful", Modality::Face), CanonicalMood::Anxious);
        assert_eq!(normalize("surprise", Modality::Face), CanonicalMood::Energetic);
        assert_eq!(normalize("disgust", Modality::Face), CanonicalMood::Angry);
        assert_eq!(normalize("contempt", Modality::Face), CanonicalMood::Neutral);
    }

    #[test]
    fn test_text_vocabulary() {
        assert_eq!(normalize("admiration", Modality::Text), CanonicalMood::Happy);
        assert_eq!(normalize("remorse", Modality::Text), CanonicalMood::Sad);
        assert_eq!(normalize("nervousness", Modality::Text), CanonicalMood::Anxious);
        assert_eq!(normalize("excitement", Modality::Text), CanonicalMood::Energetic);
        assert_eq!(normalize("relief", Modality::Text), CanonicalMood::Calm);
        assert_eq!(normalize("calm", Modality::Text), CanonicalMood::Neutral);
        assert_eq!(normalize("caring", Modality::Text), CanonicalMood::Neutral);
    }

    #[test]
    fn test_speech_vocabulary() {
        assert_eq!(normalize("ANGRY", Modality::Speech), CanonicalMood::Angry);
        assert_eq!(normalize("fearful", Modality::Speech), CanonicalMood::Anxious);
        assert_eq!(normalize("calm", Modality::Speech), CanonicalMood::Calm);
        assert_eq!(normalize("", Modality::Speech), CanonicalMood::Neutral);
    }

    #[test]
    fn test_normalization_is_case_insensitive_and_stable() {
        for modality in [Modality::Face, Modality::Text, Modality::Speech] {
            assert_eq!(normalize("SAD", modality), normalize("sad", modality));
            assert_eq!(normalize("sad", modality), normalize("sad", modality));
        }
    }
}
