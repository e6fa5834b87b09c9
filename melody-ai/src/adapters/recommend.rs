//! Recommendation re-ranking
//!
//! Optional embedding re-rank of candidate songs against the listener's
//! current mood and recent journal history. Off unless an embedding tier is
//! enabled; any embedding failure returns the candidates untouched.

use crate::clients::HuggingFaceClient;
use crate::types::TierError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use melody_common::EngineConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// History entries folded into the context string
const HISTORY_CONTEXT_LIMIT: usize = 10;

/// Song candidate supplied by the catalog collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub mood_tags: Vec<String>,
    /// Caller fields passed through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SongCandidate {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    /// Text embedded for this song
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.artist,
            self.genres.join(" "),
            self.mood_tags.join(" ")
        )
    }
}

/// Past journal entry (most recent first)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, alias = "moodLabel")]
    pub mood: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Build the single context string for a ranking request
pub fn context_text(mood: &str, history: &[HistoryEntry]) -> String {
    let mut parts = vec![format!("Current mood: {}.", mood)];
    parts.extend(
        history
            .iter()
            .take(HISTORY_CONTEXT_LIMIT)
            .map(|h| {
                format!(
                    "Journal mood: {}, notes: {}",
                    h.mood,
                    h.notes.as_deref().unwrap_or("")
                )
            }),
    );
    parts.join("\n")
}

/// Cosine similarity with a small denominator guard
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt() + 1e-8)
}

/// Text embedding backend
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TierError>;
}

/// Hosted sentence-embedding backend
pub struct HostedEmbedder {
    client: HuggingFaceClient,
    model_id: String,
}

impl HostedEmbedder {
    pub fn new(client: HuggingFaceClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl Embedder for HostedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TierError> {
        self.client.embed(&self.model_id, text).await
    }
}

/// Mood-aware song re-ranker
pub struct RecommendationAdapter {
    embedder: Option<Arc<dyn Embedder>>,
    concurrency: usize,
}

impl RecommendationAdapter {
    /// Identity ranker
    pub fn disabled() -> Self {
        Self {
            embedder: None,
            concurrency: 1,
        }
    }

    pub fn with_embedder(embedder: Arc<dyn Embedder>, concurrency: usize) -> Self {
        Self {
            embedder: Some(embedder),
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, TierError> {
        if !config.reco_embedding_enabled() {
            return Ok(Self::disabled());
        }
        let client = HuggingFaceClient::new(&config.huggingface, config.remote_timeout)?;
        Ok(Self::with_embedder(
            Arc::new(HostedEmbedder::new(client, &config.huggingface.embed_model)),
            config.rank_concurrency,
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.embedder.is_some()
    }

    /// Reorder `songs` by similarity to the mood context
    ///
    /// Returns `songs` unchanged when disabled or when any embedding fails.
    pub async fn rank_songs(
        &self,
        mood: &str,
        history: &[HistoryEntry],
        songs: Vec<SongCandidate>,
    ) -> Vec<SongCandidate> {
        let Some(embedder) = &self.embedder else {
            return songs;
        };
        if songs.is_empty() {
            return songs;
        }

        match self.score_songs(embedder.as_ref(), mood, history, &songs).await {
            Ok(scores) => {
                let mut ranked: Vec<(f64, SongCandidate)> = scores.into_iter().zip(songs).collect();
                // Stable: ties keep caller order
                ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
                debug!(count = ranked.len(), "Songs re-ranked by embedding similarity");
                ranked.into_iter().map(|(_, song)| song).collect()
            }
            Err(e) => {
                warn!(error = %e, "Embedding re-rank failed, keeping original order");
                songs
            }
        }
    }

    async fn score_songs(
        &self,
        embedder: &dyn Embedder,
        mood: &str,
        history: &[HistoryEntry],
        songs: &[SongCandidate],
    ) -> Result<Vec<f64>, TierError> {
        let context = embedder.embed(&context_text(mood, history)).await?;

        let texts: Vec<String> = songs.iter().map(SongCandidate::embedding_text).collect();
        let context = &context;

        // `buffered` yields in input order, so scores line up with `songs`
        stream::iter(texts)
            .map(|text| async move {
                let vector = embedder.embed(&text).await?;
                Ok::<f64, TierError>(cosine_similarity(context, &vector))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
