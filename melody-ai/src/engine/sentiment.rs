//! Lexicon sentiment scorer
//!
//! Deterministic, I/O-free scorer that is the authoritative final tier of
//! lyrics analysis.
//!
//! # Algorithm
//! 1. Tokenize: lowercase, non-word characters become spaces, drop tokens of 2 chars or less
//! 2. Raw score per emotion: substring matches × emotion weight × category multiplier
//! 3. Negation: `not|no|never|dont|wont|cant` before a direct/concept word costs that emotion 0.5
//! 4. Normalize by token frequency, with a 1.5× boost above 0.1
//! 5. Dominant mood, confidence, intensity and the top-4 breakdown derive from the normalized scores
//!
//! Thresholds and evaluation order are fixed; fixtures depend on exact output.

use super::lexicon::{Category, Lexicon, LEXICON, NEGATIONS};
use crate::types::Verdict;
use melody_common::{CanonicalMood, Emotion, EmotionShare, MoodEstimate, MoodSource};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::json;
use std::ops::{Index, IndexMut};

/// Share of the total below which an emotion is left out of the breakdown
const BREAKDOWN_THRESHOLD: f64 = 0.05;
/// Maximum breakdown entries
const BREAKDOWN_LIMIT: usize = 4;
/// Top score at or below which the text is considered neutral
const DOMINANCE_THRESHOLD: f64 = 0.05;
const NEGATION_PENALTY: f64 = 0.5;

// ============================================================================
// Score vectors
// ============================================================================

/// One score per scoreable emotion
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmotionScores([f64; Emotion::COUNT]);

impl EmotionScores {
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(move |e| (e, self.0[e.index()]))
    }

    /// Sum in lexicon order
    pub fn total(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, score| acc + score)
    }
}

impl Index<Emotion> for EmotionScores {
    type Output = f64;

    fn index(&self, emotion: Emotion) -> &f64 {
        &self.0[emotion.index()]
    }
}

impl IndexMut<Emotion> for EmotionScores {
    fn index_mut(&mut self, emotion: Emotion) -> &mut f64 {
        &mut self.0[emotion.index()]
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Emotion::COUNT))?;
        for (emotion, score) in self.iter() {
            map.serialize_entry(emotion.as_str(), &score)?;
        }
        map.end()
    }
}

/// Intermediate scoring state, exposed for diagnostics and tests
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub token_count: usize,
    /// Matches found per emotion before negation
    pub matches: [usize; Emotion::COUNT],
    /// Post-negation, pre-normalization scores (never negative)
    pub raw: EmotionScores,
    /// Scores in 0.0-1.0
    pub normalized: EmotionScores,
}

// ============================================================================
// Report
// ============================================================================

/// Lyrics sentiment result, shared by every lyrics tier
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    pub overall_mood: CanonicalMood,
    pub confidence: f64,
    pub intensity: u8,
    pub emotions: Vec<EmotionShare>,
    pub source: MoodSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Normalized per-emotion scores (lexicon tier only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<EmotionScores>,
}

impl Verdict for SentimentReport {
    fn mood(&self) -> CanonicalMood {
        self.overall_mood
    }
}

impl SentimentReport {
    /// Collapse into the engine-wide estimate shape
    pub fn to_estimate(&self) -> MoodEstimate {
        MoodEstimate::new(
            self.overall_mood,
            self.confidence as f32,
            self.intensity,
            self.source,
        )
        .with_details(json!({
            "emotions": self.emotions,
            "reasoning": self.reasoning,
            "scores": self.scores,
        }))
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Split text into lowercase word tokens longer than two characters
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Lexicon sentiment engine
///
/// Holds only a reference to a read-only lexicon, so `score` is pure.
#[derive(Debug, Clone, Copy)]
pub struct LexiconSentimentEngine {
    lexicon: &'static Lexicon,
}

impl Default for LexiconSentimentEngine {
    fn default() -> Self {
        Self { lexicon: &LEXICON }
    }
}

impl LexiconSentimentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run steps 1-4 and return every intermediate score
    pub fn breakdown(&self, text: &str) -> ScoreBreakdown {
        let tokens = tokenize(text);
        let token_count = tokens.len();
        let mut raw = EmotionScores::default();
        let mut matches = [0usize; Emotion::COUNT];

        for emotion in Emotion::ALL {
            let entry = self.lexicon.entry(emotion);
            for category in Category::ALL {
                for stem in entry.words(category) {
                    let count = tokens.iter().filter(|t| t.contains(stem)).count();
                    if count > 0 {
                        raw[emotion] += count as f64 * entry.weight * category.multiplier();
                        matches[emotion.index()] += count;
                    }
                }
            }
        }

        for pair in tokens.windows(2) {
            if NEGATIONS.contains(&pair[0].as_str()) {
                if let Some(emotion) = self.lexicon.negation_target(&pair[1]) {
                    raw[emotion] -= NEGATION_PENALTY;
                }
            }
        }
        for emotion in Emotion::ALL {
            raw[emotion] = raw[emotion].max(0.0);
        }

        let mut normalized = EmotionScores::default();
        for emotion in Emotion::ALL {
            let word_count = matches[emotion.index()];
            if word_count == 0 {
                continue;
            }
            let frequency = word_count as f64 / token_count as f64;
            let intensity_factor = (frequency * 5.0).min(1.0);
            let mut score =
                (raw[emotion] / (token_count as f64 * 0.02).max(1.0)).min(1.0) * intensity_factor;
            if score > 0.1 {
                score = (score * 1.5).min(1.0);
            }
            normalized[emotion] = score;
        }

        ScoreBreakdown {
            token_count,
            matches,
            raw,
            normalized,
        }
    }

    /// Score a text. Total over every input string.
    pub fn score(&self, text: &str) -> SentimentReport {
        let normalized = self.breakdown(text).normalized;

        let mut ranked: Vec<(Emotion, f64)> = normalized.iter().collect();
        // Stable: equal scores keep lexicon order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (top_emotion, top) = ranked[0];
        let second = ranked[1].1;

        let overall_mood = if top > DOMINANCE_THRESHOLD {
            top_emotion.mood()
        } else {
            CanonicalMood::Neutral
        };

        let confidence = if top > 0.0 {
            (top + (top - second) * 0.3).clamp(0.6, 0.95)
        } else {
            0.5
        };

        let total = normalized.total();
        let intensity = (total * 8.0 + 2.0).round().clamp(1.0, 10.0) as u8;

        SentimentReport {
            overall_mood,
            confidence,
            intensity,
            emotions: emotion_breakdown(&normalized, total),
            source: MoodSource::LocalHeuristic,
            reasoning: None,
            scores: Some(normalized),
        }
    }
}

fn emotion_breakdown(normalized: &EmotionScores, total: f64) -> Vec<EmotionShare> {
    let mut shares: Vec<(Emotion, f64)> = normalized
        .iter()
        .map(|(emotion, score)| {
            let share = if total > 0.0 { score / total } else { 0.0 };
            // Two decimals, before the threshold and the sort
            (emotion, (share * 100.0).round() / 100.0)
        })
        .filter(|(_, share)| *share > BREAKDOWN_THRESHOLD)
        .collect();

    shares.sort_by(|a, b| b.1.total_cmp(&a.1));
    shares.truncate(BREAKDOWN_LIMIT);

    shares
        .into_iter()
        .map(|(emotion, share)| EmotionShare::new(emotion.mood(), share))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUNNY: &str =
        "I'm feeling so good today, the sun is shining bright, I'm dancing in the light";

    fn engine() -> LexiconSentimentEngine {
        LexiconSentimentEngine::new()
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_short_tokens() {
        assert_eq!(
            tokenize("I'm SO happy!! It's... great, ok?"),
            vec!["happy", "great"]
        );
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_sunny_lyrics_are_happy() {
        let report = engine().score(SUNNY);

        assert_eq!(report.overall_mood, CanonicalMood::Happy);
        assert!(report.confidence >= 0.6);
        assert_eq!(report.confidence, 0.95);
        assert!((1..=10).contains(&report.intensity));
        assert_eq!(report.emotions[0].emotion, CanonicalMood::Happy);
        assert_eq!(report.emotions[0].color, "#4caf50");
        assert_eq!(report.source, MoodSource::LocalHeuristic);
    }

    #[test]
    fn test_sunny_lyrics_intermediate_scores() {
        let breakdown = engine().breakdown(SUNNY);

        // feeling good today the sun shining bright dancing the light
        assert_eq!(breakdown.token_count, 10);
        // "bright" and "light" are happy concepts
        assert_eq!(breakdown.matches[Emotion::Happy.index()], 2);
        assert_eq!(breakdown.raw[Emotion::Happy], 3.0);
        assert_eq!(breakdown.normalized[Emotion::Happy], 1.0);
    }

    #[test]
    fn test_empty_input_is_neutral() {
        for text in ["", "   ", "a b c"] {
            let report = engine().score(text);
            assert_eq!(report.overall_mood, CanonicalMood::Neutral);
            assert_eq!(report.confidence, 0.5);
            assert_eq!(report.intensity, 2);
            assert!(report.emotions.is_empty());
        }
    }

    #[test]
    fn test_score_is_idempotent() {
        let text = "Tears fall in the cold night rain, I cannot fight this fear";
        assert_eq!(engine().score(text), engine().score(text));
    }

    #[test]
    fn test_negation_lowers_raw_score() {
        let plain = engine().breakdown("I am happy");
        let negated = engine().breakdown("I am not happy");

        assert_eq!(plain.raw[Emotion::Happy], 2.0);
        assert_eq!(negated.raw[Emotion::Happy], 1.5);
    }

    #[test]
    fn test_negation_lowers_normalized_score_in_long_text() {
        let filler = |n: usize| vec!["qqq"; n].join(" ");
        let plain = engine().breakdown(&format!("happy {}", filler(99)));
        let negated = engine().breakdown(&format!("not happy {}", filler(98)));

        assert_eq!(plain.token_count, negated.token_count);
        assert!(negated.normalized[Emotion::Happy] < plain.normalized[Emotion::Happy]);
    }

    #[test]
    fn test_negation_hits_first_listing_emotion_only() {
        // "lost" is a concept of both sad and anxious
        let plain = engine().breakdown("lost");
        let negated = engine().breakdown("never lost");

        assert!((plain.raw[Emotion::Sad] - 1.8).abs() < 1e-9);
        assert!((negated.raw[Emotion::Sad] - 1.3).abs() < 1e-9);
        assert_eq!(plain.raw[Emotion::Anxious], negated.raw[Emotion::Anxious]);
    }

    #[test]
    fn test_breakdown_limited_and_sorted() {
        let text = "happy sad angry energetic calm anxious joy cry rage power peace fear";
        let report = engine().score(text);

        assert!(report.emotions.len() <= 4);
        assert!(report
            .emotions
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
        assert!(report.emotions.iter().all(|e| e.score > 0.05));
    }

    #[test]
    fn test_breakdown_shares_rounded_before_filter_and_sort() {
        let mut scores = EmotionScores::default();
        scores[Emotion::Happy] = 0.331;
        scores[Emotion::Sad] = 0.333;
        scores[Emotion::Angry] = 0.336;
        let breakdown = emotion_breakdown(&scores, scores.total());

        // Happy and sad tie at 0.33 and keep lexicon order
        let order: Vec<_> = breakdown.iter().map(|e| e.emotion).collect();
        assert_eq!(
            order,
            vec![CanonicalMood::Angry, CanonicalMood::Happy, CanonicalMood::Sad]
        );
        assert_eq!(breakdown[0].score, 0.34);
        assert_eq!(breakdown[1].score, 0.33);

        let mut scores = EmotionScores::default();
        scores[Emotion::Happy] = 0.054;
        scores[Emotion::Calm] = 0.946;
        let breakdown = emotion_breakdown(&scores, scores.total());
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].emotion, CanonicalMood::Calm);
        assert_eq!(breakdown[0].score, 0.95);
    }

    #[test]
    fn test_long_input_does_not_panic() {
        let text = "storm ".repeat(50_000);
        let report = engine().score(&text);
        assert_eq!(report.overall_mood, CanonicalMood::Sad);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let value = serde_json::to_value(engine().score(SUNNY)).unwrap();
        assert_eq!(value["overallMood"], "happy");
        assert_eq!(value["source"], "local_heuristic");
        assert_eq!(value["scores"]["happy"], 1.0);
        assert!(value.get("reasoning").is_none());
    }

    #[test]
    fn test_to_estimate_keeps_label_and_source() {
        let estimate = engine().score(SUNNY).to_estimate();
        assert_eq!(estimate.mood_label(), CanonicalMood::Happy);
        assert_eq!(estimate.source(), MoodSource::LocalHeuristic);
        assert_eq!(estimate.intensity(), 10);
    }
}
