//! Music assistant chat endpoint

use crate::adapters::ChatSource;
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub source: ChatSource,
}

/// POST /api/chat
///
/// **Request:** `{"message": "Recommend happy songs"}`
///
/// **Errors:**
/// - 400 Bad Request: message missing or blank
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let reply = state.engine.chat.reply(&message).await;
    info!(source = ?reply.source, chars = message.chars().count(), "Chat reply");

    Ok(Json(ChatResponse {
        success: true,
        message: reply.message,
        source: reply.source,
    }))
}

/// Build chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}
