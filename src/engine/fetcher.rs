//! # engine::fetcher
//!
//! **Retrying Fetcher** wraps a [`PriceSource`] with a cache check,
//! per-attempt timeouts and linear backoff.
//!
//! ```text
//! fetch(key)
//!     │
//!     ├─ cache hit? ──────────────────────────────▶ return cached quote
//!     │
//!     └─ attempt n = 1..=max_attempts
//!            ├─ lookup(key) bounded by attempt_timeout (fresh each time)
//!            ├─ ok   → cache.set(key) → return
//!            └─ fail → sleep(base_delay × n) → next attempt
//!                      (last failure is returned as the error source)
//! ```
//!
//! Failures are not classified: a 404, a timeout and a broken body are all
//! retried identically.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::PriceCache;
use crate::models::PriceQuote;
use crate::source::{PriceSource, SourceError};

// ─── Policy ───────────────────────────────────────────────────────────────────

/// Retry and timeout knobs, loaded once from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    /// Attempts per ingredient (at least 1 is always made).
    pub max_attempts: u32,
    /// Backoff after failed attempt `n` is `base_delay × n`.
    pub base_delay: Duration,
    /// Budget for a single attempt; every retry gets a fresh one.
    pub attempt_timeout: Duration,
    /// Optional bound on the whole retry loop of one ingredient.
    pub deadline: Option<Duration>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(800),
            attempt_timeout: Duration::from_secs(60),
            deadline: None,
        }
    }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    /// Carries the last attempt's error, rendered into the message.
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: SourceError },

    #[error("fetch deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

// ─── Fetcher ──────────────────────────────────────────────────────────────────

/// Cheap to clone; one clone is moved into every per-ingredient task.
#[derive(Clone)]
pub struct RetryingFetcher {
    source: Arc<dyn PriceSource>,
    cache: PriceCache,
    policy: FetchPolicy,
}

impl RetryingFetcher {
    pub fn new(source: Arc<dyn PriceSource>, cache: PriceCache, policy: FetchPolicy) -> Self {
        Self { source, cache, policy }
    }

    /// Fetch with the configured attempt count, backoff and optional deadline.
    pub async fn fetch_with_policy(&self, source_key: &str) -> Result<PriceQuote, FetchError> {
        let fetch = self.fetch(source_key, self.policy.max_attempts, self.policy.base_delay);

        match self.policy.deadline {
            Some(deadline) => tokio::time::timeout(deadline, fetch)
                .await
                .unwrap_or(Err(FetchError::DeadlineExceeded(deadline))),
            None => fetch.await,
        }
    }

    /// Cache-first lookup with up to `max_attempts` timeout-bounded tries.
    pub async fn fetch(
        &self,
        source_key: &str,
        max_attempts: u32,
        base_delay: Duration,
    ) -> Result<PriceQuote, FetchError> {
        if let Some(quote) = self.cache.get(source_key).await {
            debug!(source_key, "Price cache hit");
            return Ok(quote);
        }
        debug!(source_key, "Price cache miss, contacting source");

        let attempts = max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(source_key).await {
                Ok(quote) => {
                    self.cache.set(source_key, quote.clone()).await;
                    debug!(source_key, attempt, "Price fetched and cached");
                    return Ok(quote);
                }
                Err(last) if attempt >= attempts => {
                    warn!(source_key, attempts, error = %last, "Price fetch exhausted retries");
                    return Err(FetchError::Exhausted { attempts, last });
                }
                Err(e) => {
                    let backoff = base_delay * attempt;
                    warn!(
                        source_key,
                        attempt,
                        of = attempts,
                        ?backoff,
                        error = %e,
                        "Price fetch attempt failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, source_key: &str) -> Result<PriceQuote, SourceError> {
        let timeout = self.policy.attempt_timeout;
        tokio::time::timeout(timeout, self.source.lookup(source_key))
            .await
            .unwrap_or(Err(SourceError::Timeout(timeout)))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
