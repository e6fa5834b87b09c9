//! OpenRouter chat-completions client
//!
//! Used by the lyrics-sentiment LLM tier and the chat assistant. The lyrics
//! tier asks for a bare JSON object. Replies may still wrap it in prose or
//! code fences, so the first balanced object is extracted before parsing.
//!
//! # API Reference
//! - Endpoint: https://openrouter.ai/api/v1/chat/completions

use crate::types::TierError;
use melody_common::config::OpenRouterConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REFERER: &str = "http://localhost:8000";
const SENTIMENT_TITLE: &str = "MelodyMind Sentiment Analysis";
const CHAT_TITLE: &str = "MelodyMind Chat";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Sampling settings and attribution for one kind of call
struct CallProfile {
    max_tokens: u32,
    temperature: f32,
    top_p: Option<f32>,
    title: &'static str,
}

const SENTIMENT_PROFILE: CallProfile = CallProfile {
    max_tokens: 500,
    temperature: 0.3,
    top_p: Some(0.9),
    title: SENTIMENT_TITLE,
};

const CHAT_PROFILE: CallProfile = CallProfile {
    max_tokens: 1000,
    temperature: 0.7,
    top_p: None,
    title: CHAT_TITLE,
};

/// OpenRouter client
#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenRouterClient {
    /// Create a client from resolved configuration
    pub fn new(config: &OpenRouterConfig, timeout: Duration) -> Result<Self, TierError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TierError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            model: config.model.clone(),
        })
    }

    /// Send a single-turn analysis prompt and return the reply text
    pub async fn complete(&self, prompt: &str) -> Result<String, TierError> {
        let messages = vec![ChatMessage {
            role: "user",
            content: prompt,
        }];
        self.send(messages, &SENTIMENT_PROFILE).await
    }

    /// Send a conversational message under a system persona
    pub async fn chat(&self, system: &str, message: &str) -> Result<String, TierError> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: message,
            },
        ];
        self.send(messages, &CHAT_PROFILE).await
    }

    async fn send(
        &self,
        messages: Vec<ChatMessage<'_>>,
        profile: &CallProfile,
    ) -> Result<String, TierError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TierError::NotConfigured("OPENROUTER_API_KEY not set".to_string()))?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: profile.max_tokens,
            temperature: profile.temperature,
            top_p: profile.top_p,
        };

        debug!(
            model = %self.model,
            title = profile.title,
            prompt_chars = request.messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "OpenRouter request"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", profile.title)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TierError::Api(format!("OpenRouter returned {}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| TierError::Parse(format!("Failed to parse OpenRouter response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| TierError::Parse("No response content from OpenRouter".to_string()))
    }
}

/// Extract the first balanced `{...}` block from free text
///
/// Braces inside JSON string literals are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse an LLM reply into a JSON value via [`extract_json_object`]
pub fn parse_reply_object(reply: &str) -> Result<Value, TierError> {
    let candidate = extract_json_object(reply).unwrap_or(reply);
    serde_json::from_str(candidate)
        .map_err(|e| TierError::Parse(format!("Invalid JSON response from LLM: {}", e)))
}

/// Read a number that a model may have emitted as a JSON string
pub fn lenient_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n: &f64| n.is_finite())
}
