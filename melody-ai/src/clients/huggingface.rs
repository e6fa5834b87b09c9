//! Hugging Face Inference API client
//!
//! Hosted classifiers (face expression, speech emotion, 3-class sentiment)
//! and sentence embeddings share one authenticated endpoint shape:
//! `POST {base_url}/models/{model_id}`.
//!
//! # API Reference
//! - Endpoint: https://api-inference.huggingface.co/models/{model_id}
//! - Binary inputs (images, audio) are posted as the raw request body
//! - Text inputs are posted as `{"inputs": "..."}`

use crate::types::TierError;
use melody_common::config::HuggingFaceConfig;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// One `{label, score}` entry of a classifier response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Classifier responses come flat or nested one level deep
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

impl ClassificationResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassificationResponse::Flat(scores) => scores,
            ClassificationResponse::Nested(rows) => rows.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Embedding responses come as a vector or a single-row matrix
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Vector(Vec<f32>),
    Matrix(Vec<Vec<f32>>),
}

/// Hugging Face Inference API client
///
/// # Example
/// ```rust,ignore
/// use melody_ai::clients::huggingface::HuggingFaceClient;
///
/// let client = HuggingFaceClient::new(&config.huggingface, config.remote_timeout)?;
/// let scores = client.classify_bytes(&config.huggingface.image_model, &jpeg).await?;
/// ```
#[derive(Clone)]
pub struct HuggingFaceClient {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Bearer token, if configured
    api_token: Option<String>,
}

impl HuggingFaceClient {
    /// Create a client from resolved configuration
    pub fn new(config: &HuggingFaceConfig, timeout: Duration) -> Result<Self, TierError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TierError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token().map(str::to_string),
        })
    }

    fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.base_url, model_id)
    }

    fn token(&self) -> Result<&str, TierError> {
        self.api_token
            .as_deref()
            .ok_or_else(|| TierError::NotConfigured("HF_API_TOKEN not set".to_string()))
    }

    /// Classify a binary payload (image or audio)
    ///
    /// Returns scores sorted by descending score.
    pub async fn classify_bytes(
        &self,
        model_id: &str,
        payload: &[u8],
    ) -> Result<Vec<LabelScore>, TierError> {
        let token = self.token()?;
        debug!(model = model_id, payload_bytes = payload.len(), "Hugging Face binary request");

        let response = self
            .http_client
            .post(self.model_url(model_id))
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(payload.to_vec())
            .send()
            .await?;

        let body = Self::check_status(response).await?;
        parse_classification(&body)
    }

    /// Classify a text input
    ///
    /// Returns scores sorted by descending score.
    pub async fn classify_text(
        &self,
        model_id: &str,
        text: &str,
    ) -> Result<Vec<LabelScore>, TierError> {
        let body = self.post_json(model_id, text).await?;
        parse_classification(&body)
    }

    /// Embed a text input into a dense vector
    pub async fn embed(&self, model_id: &str, text: &str) -> Result<Vec<f32>, TierError> {
        let body = self.post_json(model_id, text).await?;
        parse_embedding(&body)
    }

    async fn post_json(&self, model_id: &str, text: &str) -> Result<String, TierError> {
        let token = self.token()?;
        debug!(model = model_id, chars = text.chars().count(), "Hugging Face text request");

        let response = self
            .http_client
            .post(self.model_url(model_id))
            .bearer_auth(token)
            .json(&json!({ "inputs": text }))
            .send()
            .await?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<String, TierError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TierError::Api(format!(
                "Hugging Face returned {}: {}",
                status, body
            )));
        }
        Ok(body)
    }
}

/// Parse a classifier body into descending-score order
pub fn parse_classification(body: &str) -> Result<Vec<LabelScore>, TierError> {
    let response: ClassificationResponse = serde_json::from_str(body)
        .map_err(|e| TierError::Parse(format!("Unexpected classifier response: {}", e)))?;

    let mut scores = response.into_scores();
    if scores.is_empty() {
        return Err(TierError::Parse("Classifier returned no labels".to_string()));
    }
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scores)
}

/// Parse an embedding body, taking the first row of a matrix
pub fn parse_embedding(body: &str) -> Result<Vec<f32>, TierError> {
    let response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| TierError::Parse(format!("Unexpected embedding response: {}", e)))?;

    let vector = match response {
        EmbeddingResponse::Vector(v) => v,
        EmbeddingResponse::Matrix(rows) => rows.into_iter().next().unwrap_or_default(),
    };
    if vector.is_empty() {
        return Err(TierError::Parse("Embedding is empty".to_string()));
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_classification_sorted() {
        let body = r#"[{"label":"sad","score":0.2},{"label":"happy","score":0.7}]"#;
        let scores = parse_classification(body).unwrap();
        assert_eq!(scores[0].label, "happy");
        assert_eq!(scores[1].label, "sad");
    }

    #[test]
    fn test_parse_nested_classification() {
        let body = r#"[[{"label":"LABEL_0","score":0.1},{"label":"LABEL_2","score":0.85}]]"#;
        let scores = parse_classification(body).unwrap();
        assert_eq!(scores[0].label, "LABEL_2");
    }

    #[test]
    fn test_parse_classification_rejects_error_body() {
        let body = r#"{"error":"Model is currently loading","estimated_time":20.0}"#;
        assert!(matches!(parse_classification(body), Err(TierError::Parse(_))));
        assert!(matches!(parse_classification("[]"), Err(TierError::Parse(_))));
    }

    #[test]
    fn test_parse_embedding_shapes() {
        assert_eq!(parse_embedding("[0.1, 0.2]").unwrap(), vec![0.1, 0.2]);
        assert_eq!(parse_embedding("[[0.3, 0.4]]").unwrap(), vec![0.3, 0.4]);
        assert!(parse_embedding("[]").is_err());
    }

    #[tokio::test]
    async fn test_missing_token_is_not_configured() {
        let config = melody_common::EngineConfig::default();
        let client = HuggingFaceClient::new(&config.huggingface, Duration::from_secs(1)).unwrap();

        let result = client.classify_text("any/model", "hello").await;
        assert!(matches!(result, Err(TierError::NotConfigured(_))));
    }
}
