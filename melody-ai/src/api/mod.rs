//! HTTP API handlers for melody-ai

pub mod chat;
pub mod health;
pub mod mood;
pub mod recommend;
pub mod sentiment;
pub mod voice;

pub use chat::chat_routes;
pub use health::health_routes;
pub use mood::mood_routes;
pub use recommend::recommendation_routes;
pub use sentiment::sentiment_routes;
pub use voice::voice_routes;
