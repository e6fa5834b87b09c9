//! Voice endpoints
//!
//! Command parsing plus mood detection over transcripts and speech audio.

use crate::types::{SpeechInput, TextInput};
use crate::voice::{parse_command, VoiceCommand};
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use base64::Engine as _;
use chrono::Utc;
use melody_common::{CanonicalMood, MoodEstimate, MoodSource};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
pub struct VoiceMood {
    pub mood_label: CanonicalMood,
    pub intensity: u8,
    pub confidence: f32,
    pub raw_score: f32,
}

impl From<&MoodEstimate> for VoiceMood {
    fn from(estimate: &MoodEstimate) -> Self {
        Self {
            mood_label: estimate.mood_label(),
            intensity: estimate.intensity(),
            confidence: estimate.confidence(),
            raw_score: estimate.confidence(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceCommandResponse {
    pub success: bool,
    pub command: Option<VoiceCommand>,
    pub mood: VoiceMood,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    #[serde(default)]
    pub transcript: Option<String>,
}

async fn command_with_mood(state: &AppState, text: String) -> VoiceCommandResponse {
    let command = parse_command(&text);
    let estimate = state.engine.text.analyze(&TextInput::new(text)).await;
    VoiceCommandResponse {
        success: true,
        command,
        mood: VoiceMood::from(&estimate),
    }
}

fn required(field: Option<String>, name: &str) -> ApiResult<String> {
    field
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} required", name)))
}

/// POST /api/voice/command
pub async fn voice_command(
    State(state): State<AppState>,
    Json(payload): Json<CommandRequest>,
) -> ApiResult<Json<VoiceCommandResponse>> {
    let text = required(payload.text, "text")?;
    Ok(Json(command_with_mood(&state, text).await))
}

/// POST /api/voice/analyze
pub async fn voice_analyze(
    State(state): State<AppState>,
    Json(payload): Json<TranscriptRequest>,
) -> ApiResult<Json<VoiceCommandResponse>> {
    let transcript = required(payload.transcript, "transcript")?;
    Ok(Json(command_with_mood(&state, transcript).await))
}

#[derive(Debug, Deserialize)]
pub struct SpeechEmotionRequest {
    /// Base64-encoded audio
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    /// Logged only; the audio bytes are forwarded as-is
    #[serde(default)]
    pub sample_rate: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct EmotionPrediction {
    pub emotion: CanonicalMood,
    pub score: f32,
    pub percentage: f32,
}

#[derive(Debug, Serialize)]
pub struct SpeechEmotionResponse {
    pub emotion: CanonicalMood,
    pub confidence: f32,
    pub intensity: u8,
    pub predictions: Vec<EmotionPrediction>,
    pub analysis_method: &'static str,
    pub model_used: &'static str,
    pub timestamp: String,
    pub transcript: String,
    pub raw_score: f32,
    pub source: MoodSource,
    pub details: Value,
}

/// POST /api/voice/analyze-speech-emotion
///
/// **Request:** `{"audio": "<base64>", "transcript": "...", "sample_rate": 16000}`
///
/// **Errors:**
/// - 400 Bad Request: neither audio nor transcript given
pub async fn analyze_speech_emotion(
    State(state): State<AppState>,
    Json(payload): Json<SpeechEmotionRequest>,
) -> ApiResult<Json<SpeechEmotionResponse>> {
    let audio = payload.audio.filter(|a| !a.is_empty());
    let transcript = payload.transcript.filter(|t| !t.is_empty());
    if audio.is_none() && transcript.is_none() {
        return Err(ApiError::BadRequest(
            "Either audio or transcript is required".to_string(),
        ));
    }
    if let Some(rate) = payload.sample_rate {
        debug!(sample_rate = rate, "Speech payload sample rate");
    }

    let decoded = match audio.as_deref() {
        Some(encoded) => match base64::engine::general_purpose::STANDARD.decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Audio payload is not valid base64, using transcript: {}", e);
                None
            }
        },
        None => None,
    };

    let (estimate, method) = match (decoded, transcript.as_deref()) {
        (Some(bytes), _) => {
            let speech = SpeechInput::new(bytes, transcript.clone());
            (
                state.engine.audio.analyze(&speech).await,
                "speech_emotion_recognition",
            )
        }
        (None, Some(text)) => (
            state.engine.text.analyze(&TextInput::new(text)).await,
            "text_analysis",
        ),
        (None, None) => (
            MoodEstimate::new(CanonicalMood::Neutral, 0.5, 5, MoodSource::LocalHeuristic)
                .with_details(json!({ "fallback": true, "reason": "undecodable audio" })),
            "text_analysis",
        ),
    };

    let confidence = estimate.confidence();
    Ok(Json(SpeechEmotionResponse {
        emotion: estimate.mood_label(),
        confidence,
        intensity: estimate.intensity(),
        predictions: vec![EmotionPrediction {
            emotion: estimate.mood_label(),
            score: confidence,
            percentage: confidence * 100.0,
        }],
        analysis_method: method,
        model_used: "melodymind-ai-adapter",
        timestamp: Utc::now().to_rfc3339(),
        transcript: transcript.unwrap_or_default(),
        raw_score: confidence,
        source: estimate.source(),
        details: estimate.details().clone(),
    }))
}

/// Build voice routes
pub fn voice_routes() -> Router<AppState> {
    Router::new()
        .route("/api/voice/command", post(voice_command))
        .route("/api/voice/analyze", post(voice_analyze))
        .route("/api/voice/analyze-speech-emotion", post(analyze_speech_emotion))
}
