//! Random local mood tier
//!
//! Final tier for the face and audio adapters. Samples a canonical mood
//! uniformly with a plausible confidence, so demos and tests work without
//! credentials. Production instances draw from the thread-local generator;
//! only test instances hold a seeded one.

use crate::types::{FallbackTier, SpeechInput};
use melody_common::{CanonicalMood, MoodEstimate, MoodSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::sync::Mutex;

const MIN_CONFIDENCE: f32 = 0.6;
const MAX_CONFIDENCE: f32 = 0.9;

/// Where samples are drawn from
enum Sampler {
    /// Per-thread generator, nothing shared between requests
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Uniform random mood sampler
pub struct RandomMoodTier {
    sampler: Sampler,
}

impl RandomMoodTier {
    /// Sample from the thread-local generator
    pub fn new() -> Self {
        Self {
            sampler: Sampler::Thread,
        }
    }

    /// Deterministic sampler for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            sampler: Sampler::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw<R: Rng + ?Sized>(rng: &mut R) -> (CanonicalMood, f32) {
        let mood = CanonicalMood::ALL[rng.gen_range(0..CanonicalMood::ALL.len())];
        (mood, rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE))
    }

    fn sample(&self, payload_bytes: usize, fell_through: bool) -> MoodEstimate {
        let (mood, confidence) = match &self.sampler {
            Sampler::Thread => Self::draw(&mut rand::thread_rng()),
            Sampler::Seeded(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                Self::draw(&mut *rng)
            }
        };
        let intensity = (confidence * 10.0).floor() as u8;

        MoodEstimate::new(mood, confidence, intensity, MoodSource::LocalHeuristic).with_details(
            json!({
                "mock": true,
                "fallback": fell_through,
                "payloadBytes": payload_bytes,
            }),
        )
    }
}

impl Default for RandomMoodTier {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackTier<[u8], MoodEstimate> for RandomMoodTier {
    fn name(&self) -> &'static str {
        "random-local"
    }

    fn conclude(&self, image: &[u8], fell_through: bool) -> MoodEstimate {
        self.sample(image.len(), fell_through)
    }
}

impl FallbackTier<SpeechInput, MoodEstimate> for RandomMoodTier {
    fn name(&self) -> &'static str {
        "random-local"
    }

    fn conclude(&self, speech: &SpeechInput, fell_through: bool) -> MoodEstimate {
        self.sample(speech.audio.len(), fell_through)
    }
}
