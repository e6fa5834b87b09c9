//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Module name ("melody-ai")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Tier names per adapter, in attempt order
    pub tiers: TierSummary,
}

#[derive(Debug, Serialize)]
pub struct TierSummary {
    pub face: Vec<&'static str>,
    pub text: Vec<&'static str>,
    pub audio: Vec<&'static str>,
    pub lyrics: Vec<&'static str>,
    pub chat: Vec<&'static str>,
    pub embedding_rank: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;
    let engine = &state.engine;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "melody-ai".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        tiers: TierSummary {
            face: engine.face.tier_names(),
            text: engine.text.tier_names(),
            audio: engine.audio.tier_names(),
            lyrics: engine.lyrics.tier_names(),
            chat: engine.chat.tier_names(),
            embedding_rank: engine.recommendations.is_enabled(),
        },
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
