//! Tiered fallthrough orchestration
//!
//! Every adapter is a [`TierChain`]: an ordered list of fallible
//! [`InferenceTier`]s followed by one total [`FallbackTier`].
//!
//! # Algorithm
//! 1. Attempt each inference tier in configured order, under a per-tier timeout
//! 2. Accept the first verdict that is not inconclusive
//! 3. Failures (error, timeout) and inconclusive verdicts are logged and skipped
//! 4. If nothing was accepted, the fallback tier concludes unconditionally
//!
//! Tiers are never raced or retried: later tiers are fallbacks, not alternates.

use crate::types::{FallbackTier, InferenceTier, TierError, Verdict};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-tier deadline for remote calls
pub const DEFAULT_TIER_TIMEOUT: Duration = Duration::from_secs(10);

/// Ordered fallthrough chain
pub struct TierChain<I: ?Sized + Sync, O: Verdict> {
    tiers: Vec<Arc<dyn InferenceTier<I, O>>>,
    fallback: Arc<dyn FallbackTier<I, O>>,
    timeout: Duration,
    _input: PhantomData<fn(&I)>,
}

impl<I: ?Sized + Sync, O: Verdict> TierChain<I, O> {
    /// Create a chain that only has its final tier
    pub fn new(fallback: Arc<dyn FallbackTier<I, O>>) -> Self {
        Self {
            tiers: Vec::new(),
            fallback,
            timeout: DEFAULT_TIER_TIMEOUT,
            _input: PhantomData,
        }
    }

    /// Append an inference tier (attempted after every tier added before it)
    pub fn with_tier(mut self, tier: Arc<dyn InferenceTier<I, O>>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Append an inference tier only when `enabled`
    pub fn with_tier_if<T>(self, enabled: bool, tier: impl FnOnce() -> Arc<T>) -> Self
    where
        T: InferenceTier<I, O> + 'static,
    {
        if enabled {
            self.with_tier(tier())
        } else {
            self
        }
    }

    /// Per-tier deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Names of the configured tiers, in attempt order, fallback last
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers
            .iter()
            .map(|t| t.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Attempt one tier under the chain deadline
    async fn attempt_tier(&self, tier: &dyn InferenceTier<I, O>, input: &I) -> Result<O, TierError> {
        tokio::time::timeout(self.timeout, tier.attempt(input))
            .await
            .unwrap_or_else(|_| Err(TierError::Timeout(self.timeout)))
    }

    /// Run the chain to completion
    ///
    /// Always returns a verdict; no tier failure propagates to the caller.
    pub async fn run(&self, input: &I) -> O {
        for tier in &self.tiers {
            let name = tier.name();
            match self.attempt_tier(tier.as_ref(), input).await {
                Ok(verdict) => {
                    if tier.is_inconclusive(&verdict) {
                        debug!(
                            tier = name,
                            mood = %verdict.mood(),
                            "Inconclusive verdict, trying next tier"
                        );
                        continue;
                    }
                    debug!(tier = name, mood = %verdict.mood(), "Tier verdict accepted");
                    return verdict;
                }
                Err(e) => {
                    warn!(tier = name, error = %e, "Tier failed, falling through");
                }
            }
        }

        let fell_through = !self.tiers.is_empty();
        debug!(
            tier = self.fallback.name(),
            fell_through, "Concluding with final tier"
        );
        self.fallback.conclude(input, fell_through)
    }
}

// ============================================================================
// Mock Tiers for Testing
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
