//! Local, I/O-free scoring engines

pub mod lexicon;
pub mod sentiment;

pub use sentiment::{EmotionScores, LexiconSentimentEngine, ScoreBreakdown, SentimentReport};
