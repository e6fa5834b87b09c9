//! Lyrics sentiment orchestration
//!
//! Tier order:
//! 1. Hosted LLM (OpenRouter), when an API key is configured
//! 2. Hosted 3-class sentiment classifier, when a Hugging Face token is configured
//! 3. Lexicon scorer (final, authoritative)
//!
//! A neutral verdict from either hosted tier is inconclusive and falls through.

use crate::clients::openrouter::{lenient_number, parse_reply_object};
use crate::clients::{HuggingFaceClient, LabelScore, OpenRouterClient};
use crate::engine::{LexiconSentimentEngine, SentimentReport};
use crate::tiers::TierChain;
use crate::types::{FallbackTier, InferenceTier, TierError};
use async_trait::async_trait;
use melody_common::mood::intensity_from_score;
use melody_common::{CanonicalMood, EmotionShare, EngineConfig, MoodSource};
use serde_json::Value;
use std::sync::Arc;

/// Classifier input is cut to this many characters
const CLASSIFIER_MAX_CHARS: usize = 500;
const DEFAULT_LLM_CONFIDENCE: f64 = 0.7;
const DEFAULT_LLM_INTENSITY: f64 = 5.0;
const DEFAULT_EMOTION_SCORE: f64 = 0.5;
const DEFAULT_REASONING: &str = "AI-powered analysis";

// ============================================================================
// LLM tier
// ============================================================================

fn build_prompt(lyrics: &str) -> String {
    format!(
        r##"Analyze the emotional sentiment of these song lyrics and provide a detailed analysis.

Lyrics:
"{lyrics}"

Please respond with a JSON object containing:
{{
  "overallMood": "one of: happy, sad, angry, energetic, calm, anxious, neutral",
  "confidence": "number between 0 and 1",
  "intensity": "number between 1 and 10",
  "emotions": [
    {{"emotion": "emotion_name", "score": 0.0-1.0, "color": "#hexcolor"}}
  ],
  "reasoning": "brief explanation of your analysis"
}}

Focus on the emotional content, themes, and mood conveyed by the lyrics. Consider:
- Direct emotional words and phrases
- Metaphorical language and imagery
- Overall tone and atmosphere
- Context and implied emotions

Respond only with the JSON object, no additional text."##
    )
}

/// Validate an LLM reply into a report
///
/// Unknown mood names resolve to neutral; missing numbers take defaults.
pub fn parse_llm_report(reply: &str) -> Result<SentimentReport, TierError> {
    let analysis = parse_reply_object(reply)?;
    if !analysis.is_object() {
        return Err(TierError::Parse("LLM reply is not a JSON object".to_string()));
    }

    let overall_mood = analysis
        .get("overallMood")
        .and_then(Value::as_str)
        .map(CanonicalMood::parse_lenient)
        .unwrap_or(CanonicalMood::Neutral);
    let confidence = lenient_number(analysis.get("confidence"))
        .unwrap_or(DEFAULT_LLM_CONFIDENCE)
        .clamp(0.0, 1.0);
    let intensity = lenient_number(analysis.get("intensity"))
        .unwrap_or(DEFAULT_LLM_INTENSITY)
        .clamp(1.0, 10.0)
        .round() as u8;

    let emotions = match analysis.get("emotions").and_then(Value::as_array) {
        Some(entries) => entries.iter().map(emotion_entry).collect(),
        None => vec![EmotionShare::new(overall_mood, confidence)],
    };

    let reasoning = analysis
        .get("reasoning")
        .and_then(Value::as_str)
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(DEFAULT_REASONING)
        .to_string();

    Ok(SentimentReport {
        overall_mood,
        confidence,
        intensity,
        emotions,
        source: MoodSource::RemoteLlm,
        reasoning: Some(reasoning),
        scores: None,
    })
}

fn emotion_entry(entry: &Value) -> EmotionShare {
    let emotion = entry
        .get("emotion")
        .and_then(Value::as_str)
        .map(CanonicalMood::parse_lenient)
        .unwrap_or(CanonicalMood::Neutral);
    let score = lenient_number(entry.get("score"))
        .unwrap_or(DEFAULT_EMOTION_SCORE)
        .clamp(0.0, 1.0);
    let share = EmotionShare::new(emotion, score);

    match entry.get("color").and_then(Value::as_str) {
        Some(color) if !color.trim().is_empty() => share.with_color(color),
        _ => share,
    }
}

/// Hosted LLM tier
pub struct LlmSentimentTier {
    client: OpenRouterClient,
}

impl LlmSentimentTier {
    pub fn new(client: OpenRouterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceTier<str, SentimentReport> for LlmSentimentTier {
    fn name(&self) -> &'static str {
        "openrouter-llm"
    }

    async fn attempt(&self, lyrics: &str) -> Result<SentimentReport, TierError> {
        let reply = self.client.complete(&build_prompt(lyrics)).await?;
        parse_llm_report(&reply)
    }
}

// ============================================================================
// Hosted classifier tier
// ============================================================================

/// Map a 3-class sentiment label (negative/neutral/positive) onto a mood
pub fn sentiment_label(label: &str) -> CanonicalMood {
    match label.trim().to_lowercase().as_str() {
        "label_0" | "negative" => CanonicalMood::Sad,
        "label_2" | "positive" => CanonicalMood::Happy,
        _ => CanonicalMood::Neutral,
    }
}

/// Build a report from sorted classifier scores
pub fn classifier_report(scores: &[LabelScore]) -> Result<SentimentReport, TierError> {
    let top = scores
        .first()
        .ok_or_else(|| TierError::Parse("Classifier returned no labels".to_string()))?;
    let confidence = top.score.clamp(0.0, 1.0);

    Ok(SentimentReport {
        overall_mood: sentiment_label(&top.label),
        confidence,
        intensity: intensity_from_score(confidence),
        emotions: scores
            .iter()
            .map(|s| EmotionShare::new(sentiment_label(&s.label), s.score))
            .collect(),
        source: MoodSource::RemoteClassifier,
        reasoning: None,
        scores: None,
    })
}

/// Hosted 3-class sentiment tier
pub struct HostedSentimentTier {
    client: HuggingFaceClient,
    model_id: String,
}

impl HostedSentimentTier {
    pub fn new(client: HuggingFaceClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl InferenceTier<str, SentimentReport> for HostedSentimentTier {
    fn name(&self) -> &'static str {
        "hf-sentiment"
    }

    async fn attempt(&self, lyrics: &str) -> Result<SentimentReport, TierError> {
        let input: String = lyrics.chars().take(CLASSIFIER_MAX_CHARS).collect();
        let scores = self.client.classify_text(&self.model_id, &input).await?;
        classifier_report(&scores)
    }
}

// ============================================================================
// Final tier
// ============================================================================

/// Lexicon scorer as a chain's final tier
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconTier {
    engine: LexiconSentimentEngine,
}

impl FallbackTier<str, SentimentReport> for LexiconTier {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn conclude(&self, lyrics: &str, _fell_through: bool) -> SentimentReport {
        self.engine.score(lyrics)
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Lyrics sentiment analyzer
pub struct LyricsAnalyzer {
    chain: TierChain<str, SentimentReport>,
}

impl LyricsAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Result<Self, TierError> {
        let fallback: Arc<dyn FallbackTier<str, SentimentReport>> =
            Arc::new(LexiconTier::default());
        let mut chain = TierChain::new(fallback).with_timeout(config.remote_timeout);

        if config.openrouter.api_key().is_some() {
            let client = OpenRouterClient::new(&config.openrouter, config.remote_timeout)?;
            chain = chain.with_tier(Arc::new(LlmSentimentTier::new(client)));
        }
        if config.huggingface.api_token().is_some() {
            let client = HuggingFaceClient::new(&config.huggingface, config.remote_timeout)?;
            chain = chain.with_tier(Arc::new(HostedSentimentTier::new(
                client,
                &config.huggingface.sentiment_model,
            )));
        }

        Ok(Self { chain })
    }

    pub async fn analyze(&self, lyrics: &str) -> SentimentReport {
        self.chain.run(lyrics).await
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.chain.tier_names()
    }
}
