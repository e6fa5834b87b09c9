//! Core Types and Trait Definitions for melody-ai
//!
//! Defines the tier contract behind every adapter:
//! - **InferenceTier:** a fallible strategy (hosted LLM, hosted classifier, ...)
//! - **FallbackTier:** the total final strategy that always produces a verdict
//!
//! A [`crate::tiers::TierChain`] tries inference tiers in order and hands over
//! to its fallback when all of them fail or come back inconclusive.

use async_trait::async_trait;
use melody_common::{CanonicalMood, MoodEstimate};
use thiserror::Error;

// ============================================================================
// Verdicts
// ============================================================================

/// Anything a tier can produce that carries a canonical mood
pub trait Verdict: Send {
    /// Dominant canonical mood of this verdict
    fn mood(&self) -> CanonicalMood;
}

impl Verdict for MoodEstimate {
    fn mood(&self) -> CanonicalMood {
        self.mood_label()
    }
}

// ============================================================================
// Tier traits
// ============================================================================

/// Fallible inference strategy
///
/// # Example
/// ```rust,ignore
/// use melody_ai::types::{InferenceTier, TierError};
///
/// pub struct HostedFaceClassifier { /* ... */ }
///
/// #[async_trait::async_trait]
/// impl InferenceTier<[u8], MoodEstimate> for HostedFaceClassifier {
///     fn name(&self) -> &'static str { "hf-face" }
///
///     async fn attempt(&self, image: &[u8]) -> Result<MoodEstimate, TierError> {
///         let top = self.client.classify_binary(&self.model, image).await?;
///         Ok(estimate_from(top))
///     }
/// }
/// ```
#[async_trait]
pub trait InferenceTier<I, O>: Send + Sync
where
    I: ?Sized + Sync,
    O: Verdict,
{
    /// Tier name for logging and provenance
    fn name(&self) -> &'static str;

    /// Try to produce a verdict
    ///
    /// # Errors
    /// Any `TierError` makes the chain fall through to the next tier.
    async fn attempt(&self, input: &I) -> Result<O, TierError>;

    /// Whether a successful verdict should still be treated as "try the next tier"
    ///
    /// A neutral verdict from a probabilistic tier is inconclusive by default.
    fn is_inconclusive(&self, verdict: &O) -> bool {
        verdict.mood() == CanonicalMood::Neutral
    }
}

/// Final, total strategy of a chain
///
/// Cannot fail and performs no I/O, so a chain always terminates with a verdict.
pub trait FallbackTier<I, O>: Send + Sync
where
    I: ?Sized,
{
    /// Tier name for logging and provenance
    fn name(&self) -> &'static str;

    /// Produce a verdict
    ///
    /// `fell_through` is true when at least one earlier tier was attempted and
    /// did not produce an accepted verdict.
    fn conclude(&self, input: &I, fell_through: bool) -> O;
}

// ============================================================================
// Errors
// ============================================================================

/// Tier failure
///
/// Never escapes a [`crate::tiers::TierChain`]: every variant is logged and
/// triggers fallthrough.
#[derive(Debug, Error)]
pub enum TierError {
    /// Missing credential or model configuration
    #[error("Tier not configured: {0}")]
    NotConfigured(String),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Remote call exceeded its deadline
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Remote service returned a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Response did not match the expected schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for TierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TierError::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            TierError::Parse(err.to_string())
        } else {
            TierError::Network(err.to_string())
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Speech payload: raw audio bytes plus an optional transcript
#[derive(Debug, Clone, Default)]
pub struct SpeechInput {
    pub audio: Vec<u8>,
    pub transcript: Option<String>,
}

impl SpeechInput {
    pub fn new(audio: Vec<u8>, transcript: Option<String>) -> Self {
        Self { audio, transcript }
    }

    /// Transcript, if one accompanies the audio and is not blank
    pub fn transcript(&self) -> Option<&str> {
        self.transcript
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Free-text payload with an optional caller-supplied intensity
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub text: String,
    pub intensity: Option<u8>,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intensity: None,
        }
    }

    pub fn with_intensity(mut self, intensity: Option<u8>) -> Self {
        self.intensity = intensity;
        self
    }
}
