//! # MelodyMind Common Library
//!
//! Shared code for the mood inference engine:
//! - Canonical mood vocabulary and label normalization
//! - Mood estimate value objects
//! - Engine configuration loading (environment → TOML → defaults)
//! - Common error types

pub mod config;
pub mod error;
pub mod mood;
pub mod vocabulary;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use mood::{CanonicalMood, Emotion, EmotionShare, MoodEstimate, MoodSource};
pub use vocabulary::{normalize, Modality};
