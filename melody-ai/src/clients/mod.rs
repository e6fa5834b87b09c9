//! Remote service clients
//!
//! Thin HTTP wrappers that validate response bodies into typed values at the
//! boundary. Every failure is reported as a [`crate::types::TierError`].

pub mod huggingface;
pub mod openrouter;

pub use huggingface::{HuggingFaceClient, LabelScore};
pub use openrouter::OpenRouterClient;
