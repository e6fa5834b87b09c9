//! Audio mood adapter
//!
//! Tier order:
//! 1. Transcript (only when configured to prefer text and a transcript is present)
//! 2. Hosted speech-emotion classifier over the raw audio buffer (hf or text
//!    mode, with a Hugging Face token)
//! 3. Random local sampler (final)

use super::face::estimate_from_scores;
use super::heuristic::RandomMoodTier;
use super::text::TextAdapter;
use crate::clients::HuggingFaceClient;
use crate::tiers::TierChain;
use crate::types::{FallbackTier, InferenceTier, SpeechInput, TextInput, TierError};
use async_trait::async_trait;
use melody_common::{EngineConfig, Modality, MoodEstimate};
use serde_json::Value;
use std::sync::Arc;

/// Routes speech through its transcript
///
/// The text classifier is deterministic, so its neutral verdict is final.
pub struct TranscriptTier {
    text: Arc<TextAdapter>,
}

impl TranscriptTier {
    pub fn new(text: Arc<TextAdapter>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl InferenceTier<SpeechInput, MoodEstimate> for TranscriptTier {
    fn name(&self) -> &'static str {
        "transcript"
    }

    async fn attempt(&self, speech: &SpeechInput) -> Result<MoodEstimate, TierError> {
        let transcript = speech
            .transcript()
            .ok_or_else(|| TierError::NotConfigured("no transcript supplied".to_string()))?;

        let estimate = self.text.analyze(&TextInput::new(transcript)).await;
        let mut details = estimate.details().clone();
        if let Value::Object(map) = &mut details {
            map.insert("viaTranscript".to_string(), Value::Bool(true));
        }
        Ok(estimate.with_details(details))
    }

    fn is_inconclusive(&self, _verdict: &MoodEstimate) -> bool {
        false
    }
}

/// Hosted speech-emotion classifier tier
pub struct HostedSpeechTier {
    client: HuggingFaceClient,
    model_id: String,
}

impl HostedSpeechTier {
    pub fn new(client: HuggingFaceClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl InferenceTier<SpeechInput, MoodEstimate> for HostedSpeechTier {
    fn name(&self) -> &'static str {
        "hf-speech"
    }

    async fn attempt(&self, speech: &SpeechInput) -> Result<MoodEstimate, TierError> {
        if speech.audio.is_empty() {
            return Err(TierError::NotConfigured("no audio supplied".to_string()));
        }
        let scores = self.client.classify_bytes(&self.model_id, &speech.audio).await?;
        estimate_from_scores(&scores, Modality::Speech)
    }
}

/// Audio mood adapter
pub struct AudioAdapter {
    chain: TierChain<SpeechInput, MoodEstimate>,
}

impl AudioAdapter {
    pub fn from_config(config: &EngineConfig, text: Arc<TextAdapter>) -> Result<Self, TierError> {
        Self::with_fallback(config, text, RandomMoodTier::new())
    }

    /// Build with a specific final sampler (seeded in tests)
    pub fn with_fallback(
        config: &EngineConfig,
        text: Arc<TextAdapter>,
        fallback: RandomMoodTier,
    ) -> Result<Self, TierError> {
        let fallback: Arc<dyn FallbackTier<SpeechInput, MoodEstimate>> = Arc::new(fallback);
        let mut chain = TierChain::new(fallback)
            .with_timeout(config.remote_timeout)
            .with_tier_if(config.audio_prefers_text(), || {
                Arc::new(TranscriptTier::new(text))
            });

        if config.audio_remote_enabled() {
            let client = HuggingFaceClient::new(&config.huggingface, config.remote_timeout)?;
            chain = chain.with_tier(Arc::new(HostedSpeechTier::new(
                client,
                &config.huggingface.audio_model,
            )));
        }

        Ok(Self { chain })
    }

    pub async fn analyze(&self, speech: &SpeechInput) -> MoodEstimate {
        self.chain.run(speech).await
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.chain.tier_names()
    }
}
