//! Face mood adapter
//!
//! Tier 1: hosted facial-expression classifier (raw image bytes in).
//! Final: random local sampler.

use super::heuristic::RandomMoodTier;
use crate::clients::{HuggingFaceClient, LabelScore};
use crate::tiers::TierChain;
use crate::types::{FallbackTier, InferenceTier, TierError};
use async_trait::async_trait;
use melody_common::mood::intensity_from_score;
use melody_common::{normalize, EngineConfig, Modality, MoodEstimate, MoodSource};
use serde_json::json;
use std::sync::Arc;

/// Number of raw predictions kept in estimate details
const KEPT_PREDICTIONS: usize = 5;

/// Build an estimate from a sorted classifier response
pub(crate) fn estimate_from_scores(
    scores: &[LabelScore],
    modality: Modality,
) -> Result<MoodEstimate, TierError> {
    let top = scores
        .first()
        .ok_or_else(|| TierError::Parse("Classifier returned no labels".to_string()))?;
    let mood = normalize(&top.label, modality);

    Ok(MoodEstimate::new(
        mood,
        top.score as f32,
        intensity_from_score(top.score),
        MoodSource::RemoteClassifier,
    )
    .with_details(json!({
        "label": top.label,
        "predictions": &scores[..scores.len().min(KEPT_PREDICTIONS)],
    })))
}

/// Hosted facial-expression classifier tier
pub struct HostedFaceTier {
    client: HuggingFaceClient,
    model_id: String,
}

impl HostedFaceTier {
    pub fn new(client: HuggingFaceClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl InferenceTier<[u8], MoodEstimate> for HostedFaceTier {
    fn name(&self) -> &'static str {
        "hf-face"
    }

    async fn attempt(&self, image: &[u8]) -> Result<MoodEstimate, TierError> {
        let scores = self.client.classify_bytes(&self.model_id, image).await?;
        estimate_from_scores(&scores, Modality::Face)
    }
}

/// Face mood adapter
pub struct FaceAdapter {
    chain: TierChain<[u8], MoodEstimate>,
}

impl FaceAdapter {
    pub fn from_config(config: &EngineConfig) -> Result<Self, TierError> {
        Self::with_fallback(config, RandomMoodTier::new())
    }

    /// Build with a specific final sampler (seeded in tests)
    pub fn with_fallback(config: &EngineConfig, fallback: RandomMoodTier) -> Result<Self, TierError> {
        let fallback: Arc<dyn FallbackTier<[u8], MoodEstimate>> = Arc::new(fallback);
        let mut chain = TierChain::new(fallback).with_timeout(config.remote_timeout);

        if config.face_remote_enabled() {
            let client = HuggingFaceClient::new(&config.huggingface, config.remote_timeout)?;
            chain = chain.with_tier(Arc::new(HostedFaceTier::new(
                client,
                &config.huggingface.image_model,
            )));
        }

        Ok(Self { chain })
    }

    pub async fn analyze(&self, image: &[u8]) -> MoodEstimate {
        self.chain.run(image).await
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.chain.tier_names()
    }
}
