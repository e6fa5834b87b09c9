//! Text mood adapter
//!
//! Single-tier chain around a deterministic keyword classifier. Keyword sets
//! are checked in a fixed priority order so that overlapping vocabulary
//! resolves predictably ("pumped and happy" is energetic).

use crate::tiers::TierChain;
use crate::types::{FallbackTier, TextInput};
use melody_common::{CanonicalMood, MoodEstimate, MoodSource};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_INTENSITY: u8 = 5;

/// One keyword set with the verdict it produces
struct KeywordSet {
    mood: CanonicalMood,
    confidence: f32,
    keywords: &'static [&'static str],
}

/// Checked strictly in this order
static KEYWORD_SETS: [KeywordSet; 6] = [
    KeywordSet {
        mood: CanonicalMood::Energetic,
        confidence: 0.85,
        keywords: &[
            "energetic", "pumped", "hyped", "motivated", "active", "dynamic", "vigorous", "lively",
            "bouncy", "peppy", "enthusiastic", "passionate", "intense", "powerful", "strong", "ready",
            "fired up", "raring to go",
        ],
    },
    KeywordSet {
        mood: CanonicalMood::Happy,
        confidence: 0.8,
        keywords: &[
            "happy", "joy", "excited", "great", "wonderful", "amazing", "fantastic", "awesome",
            "brilliant", "delighted", "cheerful", "optimistic", "grateful", "proud", "love", "adore",
            "enjoy", "fun", "laugh", "smile", "celebration", "success", "victory", "win",
        ],
    },
    KeywordSet {
        mood: CanonicalMood::Sad,
        confidence: 0.8,
        keywords: &[
            "sad", "down", "depressed", "upset", "miserable", "heartbroken", "grief", "sorrow",
            "melancholy", "blue", "unhappy", "disappointed", "hurt", "pain", "loss", "cry", "tears",
            "lonely", "empty", "hopeless",
        ],
    },
    KeywordSet {
        mood: CanonicalMood::Angry,
        confidence: 0.8,
        keywords: &[
            "angry", "mad", "furious", "annoyed", "frustrated", "irritated", "rage", "hate",
            "disgusted", "outraged", "livid", "enraged", "pissed", "aggravated", "bothered", "upset",
            "fuming",
        ],
    },
    KeywordSet {
        mood: CanonicalMood::Anxious,
        confidence: 0.8,
        keywords: &[
            "anxious", "worried", "nervous", "scared", "afraid", "fearful", "stressed", "tense",
            "panic", "overwhelmed", "uneasy", "restless", "apprehensive", "concerned", "troubled",
            "distressed",
        ],
    },
    // Calm vocabulary reports neutral
    KeywordSet {
        mood: CanonicalMood::Neutral,
        confidence: 0.8,
        keywords: &[
            "calm", "peaceful", "relaxed", "chill", "serene", "tranquil", "quiet", "still", "gentle",
            "soft", "mellow", "soothing", "comfortable", "content", "satisfied", "at ease",
        ],
    },
];

/// Confidence when no keyword matches: grows with text length
pub fn baseline_confidence(text: &str) -> f32 {
    let chars = text.chars().count();
    if chars == 0 {
        0.5
    } else {
        (0.3 + chars as f32 / 200.0).min(0.9)
    }
}

/// Keyword-priority classifier
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordTier;

impl KeywordTier {
    /// First matching set in priority order, with the keyword that hit
    fn classify(text: &str) -> Option<(&'static KeywordSet, &'static str)> {
        let lower = text.to_lowercase();
        KEYWORD_SETS.iter().find_map(|set| {
            set.keywords
                .iter()
                .find(|keyword| lower.contains(*keyword))
                .map(|keyword| (set, *keyword))
        })
    }
}

impl FallbackTier<TextInput, MoodEstimate> for KeywordTier {
    fn name(&self) -> &'static str {
        "keyword-local"
    }

    fn conclude(&self, input: &TextInput, fell_through: bool) -> MoodEstimate {
        let intensity = input.intensity.unwrap_or(DEFAULT_INTENSITY);

        let (mood, confidence, matched) = match Self::classify(&input.text) {
            Some((set, keyword)) => (set.mood, set.confidence, Some(keyword)),
            None => (CanonicalMood::Neutral, baseline_confidence(&input.text), None),
        };
        debug!(mood = %mood, matched = ?matched, "Keyword classification");

        MoodEstimate::new(mood, confidence, intensity, MoodSource::LocalHeuristic).with_details(
            json!({
                "mock": true,
                "fallback": fell_through,
                "matched": matched,
            }),
        )
    }
}

/// Text mood adapter
pub struct TextAdapter {
    chain: TierChain<TextInput, MoodEstimate>,
}

impl TextAdapter {
    pub fn new() -> Self {
        let fallback: Arc<dyn FallbackTier<TextInput, MoodEstimate>> = Arc::new(KeywordTier);
        Self {
            chain: TierChain::new(fallback),
        }
    }

    pub async fn analyze(&self, input: &TextInput) -> MoodEstimate {
        self.chain.run(input).await
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.chain.tier_names()
    }
}

impl Default for TextAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn analyze(text: &str) -> MoodEstimate {
        TextAdapter::new().analyze(&TextInput::new(text)).await
    }

    #[tokio::test]
    async fn test_energetic_beats_happy() {
        let estimate = analyze("I'm pumped and happy").await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Energetic);
        assert_eq!(estimate.confidence(), 0.85);
        assert_eq!(estimate.details()["matched"], "pumped");
    }

    #[tokio::test]
    async fn test_sad_before_angry_on_shared_keyword() {
        // "upset" is in both the sad and angry sets
        let estimate = analyze("honestly just upset").await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Sad);
        assert_eq!(estimate.confidence(), 0.8);
    }

    #[tokio::test]
    async fn test_calm_vocabulary_reports_neutral() {
        let estimate = analyze("Feeling calm tonight").await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Neutral);
        assert_eq!(estimate.confidence(), 0.8);
    }

    #[tokio::test]
    async fn test_multiword_keyword() {
        let estimate = analyze("Fired Up for the match").await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Energetic);
    }

    #[tokio::test]
    async fn test_no_match_uses_length_baseline() {
        let estimate = analyze("xyz").await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Neutral);
        assert!((estimate.confidence() - 0.315).abs() < 1e-6);
        assert_eq!(estimate.intensity(), 5);
        assert!(estimate.has_flag("mock"));
    }

    #[tokio::test]
    async fn test_empty_text() {
        let estimate = analyze("").await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Neutral);
        assert_eq!(estimate.confidence(), 0.5);
    }

    #[tokio::test]
    async fn test_caller_intensity_is_kept() {
        let input = TextInput::new("so angry").with_intensity(Some(9));
        let estimate = TextAdapter::new().analyze(&input).await;
        assert_eq!(estimate.mood_label(), CanonicalMood::Angry);
        assert_eq!(estimate.intensity(), 9);
    }

    #[test]
    fn test_baseline_caps_at_point_nine() {
        assert_eq!(baseline_confidence(&"x".repeat(500)), 0.9);
    }
}
