//! Recommendation endpoints
//!
//! - `POST /api/recommendations/rank`: embedding re-rank of caller-supplied songs
//! - `POST /api/recommendations`: genre seeds for a mood

use crate::adapters::{HistoryEntry, SongCandidate};
use crate::catalog::{recommend, GenreRecommendation};
use crate::{ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use melody_common::CanonicalMood;
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub songs: Vec<SongCandidate>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub songs: Vec<SongCandidate>,
}

/// POST /api/recommendations/rank
///
/// Never fails on embedding errors; the songs come back in their original order.
pub async fn rank_songs(
    State(state): State<AppState>,
    Json(payload): Json<RankRequest>,
) -> ApiResult<Json<RankResponse>> {
    let songs = state
        .engine
        .recommendations
        .rank_songs(&payload.mood, &payload.history, payload.songs)
        .await;
    Ok(Json(RankResponse { songs }))
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// POST /api/recommendations
pub async fn genre_recommendations(
    Json(payload): Json<RecommendRequest>,
) -> ApiResult<Json<GenreRecommendation>> {
    let mood = CanonicalMood::parse_lenient(&payload.mood);
    Ok(Json(recommend(mood, &payload.history, payload.limit)))
}

/// Build recommendation routes
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/recommendations", post(genre_recommendations))
        .route("/api/recommendations/rank", post(rank_songs))
}
