//! Lyrics sentiment endpoints
//!
//! - `GET /api/sentiment/moods`
//! - `POST /api/sentiment/analyze`
//! - `GET /api/sentiment/recommendations/:mood`

use crate::catalog::{curated_songs, genres_for_mood, SongRecommendation};
use crate::engine::SentimentReport;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use melody_common::CanonicalMood;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MoodInfo {
    pub name: CanonicalMood,
    pub color: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MoodsResponse {
    pub moods: Vec<MoodInfo>,
}

/// GET /api/sentiment/moods
pub async fn list_moods() -> Json<MoodsResponse> {
    Json(MoodsResponse {
        moods: CanonicalMood::ALL
            .into_iter()
            .map(|mood| MoodInfo {
                name: mood,
                color: mood.color(),
                description: mood.description(),
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeLyricsRequest {
    #[serde(default)]
    pub lyrics: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeLyricsResponse {
    #[serde(flatten)]
    pub report: SentimentReport,
    pub lyrics: String,
    pub recommendations: Vec<SongRecommendation>,
}

/// POST /api/sentiment/analyze
///
/// **Request:** `{"lyrics": "..."}`
///
/// **Errors:**
/// - 400 Bad Request: missing, blank or over-long lyrics
pub async fn analyze_lyrics(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeLyricsRequest>,
) -> ApiResult<Json<AnalyzeLyricsResponse>> {
    let lyrics = payload
        .lyrics
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("Lyrics are required and must be a non-empty string".to_string())
        })?;

    let max_chars = state.config.max_lyrics_chars;
    if lyrics.chars().count() > max_chars {
        return Err(ApiError::BadRequest(format!(
            "Lyrics are too long. Please limit to {} characters.",
            max_chars
        )));
    }

    let report = state.engine.lyrics.analyze(&lyrics).await;
    info!(
        mood = %report.overall_mood,
        confidence = report.confidence,
        intensity = report.intensity,
        source = ?report.source,
        "Lyrics sentiment analyzed"
    );

    let recommendations = curated_songs(report.overall_mood);
    Ok(Json(AnalyzeLyricsResponse {
        report,
        lyrics: lyrics.trim().to_string(),
        recommendations,
    }))
}

#[derive(Debug, Serialize)]
pub struct MoodRecommendationsResponse {
    pub mood: CanonicalMood,
    /// Catalog genres to query for more songs in this mood
    pub genres: &'static [&'static str],
    pub recommendations: Vec<SongRecommendation>,
}

/// GET /api/sentiment/recommendations/:mood
///
/// **Errors:**
/// - 404 Not Found: not a canonical mood
pub async fn mood_recommendations(
    Path(mood): Path<String>,
) -> ApiResult<Json<MoodRecommendationsResponse>> {
    let mood: CanonicalMood = mood.parse().map_err(|_| {
        ApiError::NotFound(
            "Invalid mood. Available moods: happy, sad, angry, energetic, calm, anxious"
                .to_string(),
        )
    })?;

    Ok(Json(MoodRecommendationsResponse {
        mood,
        genres: genres_for_mood(mood),
        recommendations: curated_songs(mood),
    }))
}

/// Build sentiment routes
pub fn sentiment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sentiment/moods", get(list_moods))
        .route("/api/sentiment/analyze", post(analyze_lyrics))
        .route("/api/sentiment/recommendations/:mood", get(mood_recommendations))
}
