//! Direct mood endpoints
//!
//! - `POST /api/mood/text` (`{"text": "...", "intensity": 7}`)
//! - `POST /api/mood/face` (raw image bytes)

use crate::types::TextInput;
use crate::{ApiError, ApiResult, AppState};
use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use melody_common::MoodEstimate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TextMoodRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub intensity: Option<u8>,
}

/// POST /api/mood/text
pub async fn text_mood(
    State(state): State<AppState>,
    Json(payload): Json<TextMoodRequest>,
) -> ApiResult<Json<MoodEstimate>> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text required".to_string()));
    }
    let input = TextInput::new(payload.text).with_intensity(payload.intensity);
    Ok(Json(state.engine.text.analyze(&input).await))
}

/// POST /api/mood/face
pub async fn face_mood(State(state): State<AppState>, image: Bytes) -> ApiResult<Json<MoodEstimate>> {
    if image.is_empty() {
        return Err(ApiError::BadRequest("image body required".to_string()));
    }
    Ok(Json(state.engine.face.analyze(&image).await))
}

/// Build mood routes
pub fn mood_routes() -> Router<AppState> {
    Router::new()
        .route("/api/mood/text", post(text_mood))
        .route("/api/mood/face", post(face_mood))
}
