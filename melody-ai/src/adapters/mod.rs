//! Modality adapters
//!
//! Each adapter is a [`crate::tiers::TierChain`] assembled once from the
//! immutable [`EngineConfig`]. [`MoodEngine`] bundles them for the HTTP layer.

pub mod audio;
pub mod chat;
pub mod face;
pub mod heuristic;
pub mod lyrics;
pub mod recommend;
pub mod text;

pub use audio::AudioAdapter;
pub use chat::{ChatAssistant, ChatReply, ChatSource};
pub use face::FaceAdapter;
pub use heuristic::RandomMoodTier;
pub use lyrics::LyricsAnalyzer;
pub use recommend::{HistoryEntry, RecommendationAdapter, SongCandidate};
pub use text::TextAdapter;

use crate::types::TierError;
use melody_common::EngineConfig;
use std::sync::Arc;
use tracing::info;

/// Every adapter, built from one configuration
pub struct MoodEngine {
    pub face: FaceAdapter,
    pub text: Arc<TextAdapter>,
    pub audio: AudioAdapter,
    pub lyrics: LyricsAnalyzer,
    pub recommendations: RecommendationAdapter,
    pub chat: ChatAssistant,
}

impl MoodEngine {
    /// Build all adapters
    ///
    /// # Errors
    /// Only if an HTTP client cannot be constructed. Missing credentials
    /// demote tiers instead.
    pub fn from_config(config: &EngineConfig) -> Result<Self, TierError> {
        let text = Arc::new(TextAdapter::new());
        let engine = Self {
            face: FaceAdapter::from_config(config)?,
            audio: AudioAdapter::from_config(config, Arc::clone(&text))?,
            lyrics: LyricsAnalyzer::from_config(config)?,
            recommendations: RecommendationAdapter::from_config(config)?,
            chat: ChatAssistant::from_config(config)?,
            text,
        };

        info!(
            face = ?engine.face.tier_names(),
            text = ?engine.text.tier_names(),
            audio = ?engine.audio.tier_names(),
            lyrics = ?engine.lyrics.tier_names(),
            chat = ?engine.chat.tier_names(),
            embedding_rank = engine.recommendations.is_enabled(),
            "Mood engine ready"
        );
        Ok(engine)
    }
}
