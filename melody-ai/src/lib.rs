//! melody-ai library interface
//!
//! Mood inference engine: tiered adapters over face, text, speech and lyrics
//! input, the lexicon sentiment scorer, the music assistant chat, and a thin
//! HTTP surface.

pub mod adapters;
pub mod api;
pub mod catalog;
pub mod clients;
pub mod engine;
pub mod error;
pub mod tiers;
pub mod types;
pub mod voice;

pub use crate::adapters::MoodEngine;
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use melody_common::EngineConfig;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved startup configuration (read-only)
    pub config: Arc<EngineConfig>,
    /// Adapters built from `config`
    pub engine: Arc<MoodEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Arc<EngineConfig>, engine: Arc<MoodEngine>) -> Self {
        Self {
            config,
            engine,
            startup_time: Utc::now(),
        }
    }

    /// Build the engine from `config` and wrap both
    pub fn from_config(config: EngineConfig) -> Result<Self, types::TierError> {
        let engine = MoodEngine::from_config(&config)?;
        Ok(Self::new(Arc::new(config), Arc::new(engine)))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::sentiment_routes())
        .merge(api::mood_routes())
        .merge(api::voice_routes())
        .merge(api::recommendation_routes())
        .merge(api::chat_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
