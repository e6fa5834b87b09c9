//! Mood value objects
//!
//! Canonical mood taxonomy, the six scoreable emotions, and the
//! `MoodEstimate` produced by every inference tier.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Canonical moods
// ============================================================================

/// Canonical mood label
///
/// The only vocabulary callers outside the engine ever see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalMood {
    Happy,
    Sad,
    Angry,
    Energetic,
    Calm,
    Anxious,
    Neutral,
}

impl CanonicalMood {
    /// All canonical moods, in display order
    pub const ALL: [CanonicalMood; 7] = [
        CanonicalMood::Happy,
        CanonicalMood::Sad,
        CanonicalMood::Angry,
        CanonicalMood::Energetic,
        CanonicalMood::Calm,
        CanonicalMood::Anxious,
        CanonicalMood::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalMood::Happy => "happy",
            CanonicalMood::Sad => "sad",
            CanonicalMood::Angry => "angry",
            CanonicalMood::Energetic => "energetic",
            CanonicalMood::Calm => "calm",
            CanonicalMood::Anxious => "anxious",
            CanonicalMood::Neutral => "neutral",
        }
    }

    /// Display color used by emotion breakdowns and the mood listing
    pub fn color(&self) -> &'static str {
        match self {
            CanonicalMood::Happy => "#4caf50",
            CanonicalMood::Sad => "#f44336",
            CanonicalMood::Angry => "#ff5722",
            CanonicalMood::Energetic => "#ff9800",
            CanonicalMood::Calm => "#2196f3",
            CanonicalMood::Anxious => "#e91e63",
            CanonicalMood::Neutral => "#9e9e9e",
        }
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            CanonicalMood::Happy => "Joyful and upbeat emotions",
            CanonicalMood::Sad => "Melancholic and sorrowful feelings",
            CanonicalMood::Angry => "Intense and aggressive emotions",
            CanonicalMood::Energetic => "High-energy and dynamic feelings",
            CanonicalMood::Calm => "Peaceful and tranquil emotions",
            CanonicalMood::Anxious => "Worried and nervous feelings",
            CanonicalMood::Neutral => "Balanced and neutral emotions",
        }
    }

    /// Parse a canonical label, resolving anything unrecognized to `Neutral`
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(CanonicalMood::Neutral)
    }
}

impl FromStr for CanonicalMood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CanonicalMood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == lower)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown mood: {}", s)))
    }
}

impl fmt::Display for CanonicalMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Scoreable emotions
// ============================================================================

/// One of the six lexicon-scoreable emotions
///
/// `Neutral` is the absence of a dominant signal and has no lexicon entry,
/// so it is deliberately absent here. The discriminant doubles as the index
/// into fixed-size score arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy = 0,
    Sad = 1,
    Angry = 2,
    Energetic = 3,
    Calm = 4,
    Anxious = 5,
}

impl Emotion {
    pub const COUNT: usize = 6;

    /// Lexicon evaluation order
    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Energetic,
        Emotion::Calm,
        Emotion::Anxious,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mood(self) -> CanonicalMood {
        match self {
            Emotion::Happy => CanonicalMood::Happy,
            Emotion::Sad => CanonicalMood::Sad,
            Emotion::Angry => CanonicalMood::Angry,
            Emotion::Energetic => CanonicalMood::Energetic,
            Emotion::Calm => CanonicalMood::Calm,
            Emotion::Anxious => CanonicalMood::Anxious,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.mood().as_str()
    }
}

impl From<Emotion> for CanonicalMood {
    fn from(emotion: Emotion) -> Self {
        emotion.mood()
    }
}

// ============================================================================
// Mood estimate
// ============================================================================

/// Which tier produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodSource {
    RemoteLlm,
    RemoteClassifier,
    LocalHeuristic,
}

/// Single output value object of the inference engine
///
/// Fields are private so the range invariants established by [`MoodEstimate::new`]
/// hold for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEstimate {
    mood_label: CanonicalMood,
    confidence: f32,
    intensity: u8,
    source: MoodSource,
    details: Value,
}

impl MoodEstimate {
    /// Create an estimate with confidence clamped to 0.0-1.0 and intensity to 1-10
    pub fn new(mood_label: CanonicalMood, confidence: f32, intensity: u8, source: MoodSource) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            mood_label,
            confidence,
            intensity: intensity.clamp(1, 10),
            source,
            details: Value::Null,
        }
    }

    /// Attach a diagnostic payload
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn mood_label(&self) -> CanonicalMood {
        self.mood_label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn source(&self) -> MoodSource {
        self.source
    }

    pub fn details(&self) -> &Value {
        &self.details
    }

    pub fn is_neutral(&self) -> bool {
        self.mood_label == CanonicalMood::Neutral
    }

    /// True when `details.<flag>` is the boolean `true`
    pub fn has_flag(&self, flag: &str) -> bool {
        self.details.get(flag).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Map a 0.0-1.0 model score onto the 1-10 intensity scale
pub fn intensity_from_score(score: f64) -> u8 {
    if !score.is_finite() {
        return 1;
    }
    (score * 10.0).round().clamp(1.0, 10.0) as u8
}

// ============================================================================
// Emotion breakdown entries
// ============================================================================

/// One entry of an emotion breakdown (most to least dominant)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionShare {
    pub emotion: CanonicalMood,
    pub score: f64,
    pub color: String,
}

impl EmotionShare {
    /// Create an entry with the mood's standard display color
    pub fn new(emotion: CanonicalMood, score: f64) -> Self {
        Self {
            emotion,
            score,
            color: emotion.color().to_string(),
        }
    }

    /// Override the display color (remote tiers may propose their own)
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_canonical_case_insensitive() {
        assert_eq!("HAPPY".parse::<CanonicalMood>().unwrap(), CanonicalMood::Happy);
        assert_eq!(" calm ".parse::<CanonicalMood>().unwrap(), CanonicalMood::Calm);
        assert!("surprise".parse::<CanonicalMood>().is_err());
    }

    #[test]
    fn test_parse_lenient_defaults_to_neutral() {
        assert_eq!(CanonicalMood::parse_lenient("ecstatic"), CanonicalMood::Neutral);
        assert_eq!(CanonicalMood::parse_lenient("anxious"), CanonicalMood::Anxious);
    }

    #[test]
    fn test_emotion_indices_follow_lexicon_order() {
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.index(), i);
        }
    }

    #[test]
    fn test_estimate_clamps_ranges() {
        let est = MoodEstimate::new(CanonicalMood::Sad, 1.7, 0, MoodSource::LocalHeuristic);
        assert_eq!(est.confidence(), 1.0);
        assert_eq!(est.intensity(), 1);

        let est = MoodEstimate::new(CanonicalMood::Sad, f32::NAN, 42, MoodSource::LocalHeuristic);
        assert_eq!(est.confidence(), 0.0);
        assert_eq!(est.intensity(), 10);
    }

    #[test]
    fn test_estimate_serializes_camel_case() {
        let est = MoodEstimate::new(CanonicalMood::Calm, 0.7, 6, MoodSource::RemoteClassifier)
            .with_details(json!({"mock": true}));
        let value = serde_json::to_value(&est).unwrap();
        assert_eq!(value["moodLabel"], "calm");
        assert_eq!(value["source"], "remote_classifier");
        assert_eq!(value["intensity"], 6);
        assert!(est.has_flag("mock"));
        assert!(!est.has_flag("fallback"));
    }

    #[test]
    fn test_intensity_from_score() {
        assert_eq!(intensity_from_score(0.0), 1);
        assert_eq!(intensity_from_score(0.64), 6);
        assert_eq!(intensity_from_score(0.95), 10);
        assert_eq!(intensity_from_score(f64::NAN), 1);
    }
}
