//! Engine configuration
//!
//! Resolved once at process start with **Environment → TOML → compiled default**
//! priority, then frozen. Adapters receive the resolved [`EngineConfig`] by
//! reference and never consult ambient state afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_IMAGE_MODEL: &str = "trpakov/vit-face-expression";
pub const DEFAULT_AUDIO_MODEL: &str = "ehcalabres/wav2vec2-lg-xlsr-en-speech-emotion-recognition";
pub const DEFAULT_EMBED_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_LYRICS_CHARS: usize = 10_000;
pub const DEFAULT_RANK_CONCURRENCY: usize = 4;

// ============================================================================
// Adapter modes
// ============================================================================

/// Per-modality adapter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterMode {
    /// Local heuristics only
    #[default]
    Mock,
    /// Hosted Hugging Face model
    #[serde(alias = "huggingface")]
    Hf,
    /// Route speech through its transcript (audio only)
    Text,
}

impl AdapterMode {
    fn parse(raw: &str, key: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "mock" => AdapterMode::Mock,
            "hf" | "huggingface" => AdapterMode::Hf,
            "text" => AdapterMode::Text,
            other => {
                warn!("Unknown adapter mode '{}' for {}, using mock", other, key);
                AdapterMode::Mock
            }
        }
    }
}

// ============================================================================
// TOML file schema
// ============================================================================

/// On-disk configuration (`melody-ai.toml`)
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub logging: LoggingSection,
    pub adapters: AdaptersSection,
    pub huggingface: HuggingFaceSection,
    pub openrouter: OpenRouterSection,
    pub limits: LimitsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptersSection {
    pub face: Option<AdapterMode>,
    pub text: Option<AdapterMode>,
    pub audio: Option<AdapterMode>,
    pub reco: Option<AdapterMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceSection {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub image_model: Option<String>,
    pub audio_model: Option<String>,
    pub embed_model: Option<String>,
    pub sentiment_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub remote_timeout_secs: Option<u64>,
    pub max_lyrics_chars: Option<usize>,
    pub rank_concurrency: Option<usize>,
}

impl TomlConfig {
    /// Read a TOML config file
    ///
    /// A missing file is not an error: it yields an empty config and a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using environment and compiled defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Parse TOML {} failed: {}", path.display(), e))
        })?;
        info!("Loaded config file {}", path.display());
        Ok(config)
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Hosted classifier / embedding settings
#[derive(Debug, Clone, PartialEq)]
pub struct HuggingFaceConfig {
    api_token: Option<String>,
    pub base_url: String,
    pub image_model: String,
    pub audio_model: String,
    pub embed_model: String,
    pub sentiment_model: String,
}

impl HuggingFaceConfig {
    /// Token, if a usable one was configured
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }
}

/// Hosted LLM settings
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRouterConfig {
    api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl OpenRouterConfig {
    /// Key, if a usable one was configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Frozen engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub face_mode: AdapterMode,
    pub text_mode: AdapterMode,
    pub audio_mode: AdapterMode,
    pub reco_mode: AdapterMode,
    pub huggingface: HuggingFaceConfig,
    pub openrouter: OpenRouterConfig,
    pub remote_timeout: Duration,
    pub max_lyrics_chars: usize,
    pub rank_concurrency: usize,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_HF_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            audio_model: DEFAULT_AUDIO_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
        }
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_OPENROUTER_MODEL.to_string(),
        }
    }
}

/// Compiled defaults, no credentials
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            face_mode: AdapterMode::default(),
            text_mode: AdapterMode::default(),
            audio_mode: AdapterMode::default(),
            reco_mode: AdapterMode::default(),
            huggingface: HuggingFaceConfig::default(),
            openrouter: OpenRouterConfig::default(),
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            max_lyrics_chars: DEFAULT_MAX_LYRICS_CHARS,
            rank_concurrency: DEFAULT_RANK_CONCURRENCY,
        }
    }
}

impl EngineConfig {
    /// Resolve from a TOML config plus an environment lookup
    ///
    /// `env` is injected so resolution stays a pure function of its inputs.
    pub fn resolve<F>(file: &TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, toml: &Option<String>, default: &str| -> String {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| toml.clone())
                .unwrap_or_else(|| default.to_string())
        };
        let secret = |key: &str, toml: &Option<String>| -> Option<String> {
            env(key)
                .filter(|v| is_valid_key(v))
                .or_else(|| toml.clone().filter(|v| is_valid_key(v)))
                .map(|v| v.trim().to_string())
        };
        let mode = |key: &str, toml: Option<AdapterMode>| -> AdapterMode {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| AdapterMode::parse(&v, key))
                .or(toml)
                .unwrap_or_default()
        };

        let hf = &file.huggingface;
        let or = &file.openrouter;
        let limits = &file.limits;

        let config = Self {
            host: string("MELODY_HOST", &file.server.host, DEFAULT_HOST),
            port: parse_number(&env, "MELODY_PORT")?
                .or(file.server.port)
                .unwrap_or(DEFAULT_PORT),
            log_level: string("MELODY_LOG_LEVEL", &file.logging.level, "info"),
            face_mode: mode("AI_FACE_ADAPTER", file.adapters.face),
            text_mode: mode("AI_TEXT_ADAPTER", file.adapters.text),
            audio_mode: mode("AI_AUDIO_ADAPTER", file.adapters.audio),
            reco_mode: mode("AI_RECO_ADAPTER", file.adapters.reco),
            huggingface: HuggingFaceConfig {
                api_token: secret("HF_API_TOKEN", &hf.api_token),
                base_url: string("HF_BASE_URL", &hf.base_url, DEFAULT_HF_BASE_URL),
                image_model: string("HF_IMAGE_MODEL_ID", &hf.image_model, DEFAULT_IMAGE_MODEL),
                audio_model: string("HF_AUDIO_MODEL_ID", &hf.audio_model, DEFAULT_AUDIO_MODEL),
                embed_model: string("HF_EMBED_MODEL_ID", &hf.embed_model, DEFAULT_EMBED_MODEL),
                sentiment_model: string(
                    "HF_SENTIMENT_MODEL_ID",
                    &hf.sentiment_model,
                    DEFAULT_SENTIMENT_MODEL,
                ),
            },
            openrouter: OpenRouterConfig {
                api_key: secret("OPENROUTER_API_KEY", &or.api_key),
                base_url: string("OPENROUTER_BASE_URL", &or.base_url, DEFAULT_OPENROUTER_BASE_URL),
                model: string("OPENROUTER_MODEL", &or.model, DEFAULT_OPENROUTER_MODEL),
            },
            remote_timeout: Duration::from_secs(
                parse_number(&env, "MELODY_REMOTE_TIMEOUT_SECS")?
                    .or(limits.remote_timeout_secs)
                    .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
            ),
            max_lyrics_chars: parse_number(&env, "MELODY_MAX_LYRICS_CHARS")?
                .or(limits.max_lyrics_chars)
                .unwrap_or(DEFAULT_MAX_LYRICS_CHARS),
            rank_concurrency: parse_number(&env, "MELODY_RANK_CONCURRENCY")?
                .or(limits.rank_concurrency)
                .unwrap_or(DEFAULT_RANK_CONCURRENCY)
                .max(1),
        };

        Ok(config)
    }

    /// Load from the process environment and an optional TOML file
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };
        let file = match path {
            Some(path) => TomlConfig::load(&path)?,
            None => TomlConfig::default(),
        };
        Self::resolve(&file, |key| std::env::var(key).ok())
    }

    /// Whether the hosted face classifier tier is usable
    pub fn face_remote_enabled(&self) -> bool {
        self.face_mode == AdapterMode::Hf && self.huggingface.api_token().is_some()
    }

    /// Whether the hosted speech classifier tier is usable
    ///
    /// Text mode keeps the classifier behind the transcript tier.
    pub fn audio_remote_enabled(&self) -> bool {
        matches!(self.audio_mode, AdapterMode::Hf | AdapterMode::Text)
            && self.huggingface.api_token().is_some()
    }

    /// Whether speech should be routed through its transcript
    pub fn audio_prefers_text(&self) -> bool {
        self.audio_mode == AdapterMode::Text
    }

    /// Whether embedding re-ranking is enabled
    pub fn reco_embedding_enabled(&self) -> bool {
        self.reco_mode == AdapterMode::Hf && self.huggingface.api_token().is_some()
    }

    /// Log any remote mode that was requested but cannot be honored
    pub fn log_demotions(&self) {
        let token = self.huggingface.api_token().is_some();
        for (name, mode) in [
            ("face", self.face_mode),
            ("audio", self.audio_mode),
            ("reco", self.reco_mode),
        ] {
            if mode == AdapterMode::Hf && !token {
                info!("{} adapter requested hf but HF_API_TOKEN is not set; using local tier", name);
            }
        }
        if self.text_mode == AdapterMode::Hf {
            info!("text adapter has no remote tier; keyword classifier is used");
        }
    }
}

/// Default config file location: `<config_dir>/melodymind/melody-ai.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("melodymind").join("melody-ai.toml"))
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn parse_number<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, raw))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.face_mode, AdapterMode::Mock);
        assert_eq!(config.remote_timeout, Duration::from_secs(10));
        assert_eq!(config.max_lyrics_chars, 10_000);
        assert!(config.huggingface.api_token().is_none());
        assert!(config.openrouter.api_key().is_none());
    }

    #[test]
    fn test_env_overrides_toml() {
        let mut file = TomlConfig::default();
        file.server.port = Some(9000);
        file.adapters.face = Some(AdapterMode::Mock);

        let config =
            EngineConfig::resolve(&file, env_of(&[("MELODY_PORT", "9100"), ("AI_FACE_ADAPTER", "hf")]))
                .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.face_mode, AdapterMode::Hf);
    }

    #[test]
    fn test_toml_overrides_default() {
        let mut file = TomlConfig::default();
        file.limits.rank_concurrency = Some(8);
        file.openrouter.model = Some("meta/llama".to_string());

        let config = EngineConfig::resolve(&file, env_of(&[])).unwrap();
        assert_eq!(config.rank_concurrency, 8);
        assert_eq!(config.openrouter.model, "meta/llama");
    }

    #[test]
    fn test_blank_credentials_are_absent() {
        let config = EngineConfig::resolve(
            &TomlConfig::default(),
            env_of(&[("HF_API_TOKEN", "   "), ("AI_FACE_ADAPTER", "hf")]),
        )
        .unwrap();
        assert!(config.huggingface.api_token().is_none());
        assert!(!config.face_remote_enabled(), "hf without token is demoted");
    }

    #[test]
    fn test_remote_enabled_with_token() {
        let config = EngineConfig::resolve(
            &TomlConfig::default(),
            env_of(&[("HF_API_TOKEN", "hf_abc"), ("AI_AUDIO_ADAPTER", "hf"), ("AI_RECO_ADAPTER", "hf")]),
        )
        .unwrap();
        assert!(config.audio_remote_enabled());
        assert!(config.reco_embedding_enabled());
        assert!(!config.face_remote_enabled());
    }

    #[test]
    fn test_default_matches_empty_resolution() {
        let resolved = EngineConfig::resolve(&TomlConfig::default(), env_of(&[])).unwrap();
        assert_eq!(EngineConfig::default(), resolved);
    }

    #[test]
    fn test_audio_text_mode_keeps_speech_classifier() {
        let with_token = EngineConfig::resolve(
            &TomlConfig::default(),
            env_of(&[("HF_API_TOKEN", "hf_abc"), ("AI_AUDIO_ADAPTER", "text")]),
        )
        .unwrap();
        assert!(with_token.audio_prefers_text());
        assert!(with_token.audio_remote_enabled());

        let without_token =
            EngineConfig::resolve(&TomlConfig::default(), env_of(&[("AI_AUDIO_ADAPTER", "text")]))
                .unwrap();
        assert!(!without_token.audio_remote_enabled());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = EngineConfig::resolve(&TomlConfig::default(), env_of(&[("MELODY_PORT", "eighty")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_mode_falls_back_to_mock() {
        let config =
            EngineConfig::resolve(&TomlConfig::default(), env_of(&[("AI_AUDIO_ADAPTER", "quantum")]))
                .unwrap();
        assert_eq!(config.audio_mode, AdapterMode::Mock);
    }

    #[test]
    fn test_rank_concurrency_never_zero() {
        let config = EngineConfig::resolve(
            &TomlConfig::default(),
            env_of(&[("MELODY_RANK_CONCURRENCY", "0")]),
        )
        .unwrap();
        assert_eq!(config.rank_concurrency, 1);
    }
}
