//! # cache
//!
//! The **price cache**: the only piece of mutable state shared by every
//! in-flight request and every per-ingredient fetch task.
//!
//! ## Design Decisions
//!
//! * `RwLock<HashMap<..>>` gives many concurrent readers with exclusive
//!   writers. The lock only ever guards the map operation itself; callers
//!   never hold it across a network call.
//! * Expiry is lazy. A stale entry is reported as absent by [`PriceCache::get`]
//!   and silently overwritten by the next successful fetch. There is no
//!   sweeper: the key space is the fixed set of recipe product URLs.
//! * Ages are measured with `tokio::time::Instant` so tests can drive the
//!   clock with `tokio::time::pause` / `advance`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::PriceQuote;

/// Default time-to-live for a cached quote.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    quote: PriceQuote,
    stored_at: Instant,
    /// Wall-clock time of the fetch, for the health endpoint only.
    fetched_at: DateTime<Utc>,
}

/// Freshness report for one cached key.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryStatus {
    pub source_key: String,
    pub fetched_at: DateTime<Utc>,
    pub fresh: bool,
}

/// Shared, cheaply-cloneable TTL cache keyed by source key.
#[derive(Clone)]
pub struct PriceCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached quote for `key` if it is younger than the TTL.
    pub async fn get(&self, key: &str) -> Option<PriceQuote> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.quote.clone())
    }

    /// Store `quote` under `key`, replacing whatever was there and stamping
    /// the current time.
    pub async fn set(&self, key: &str, quote: PriceQuote) {
        let entry = CacheEntry {
            quote,
            stored_at: Instant::now(),
            fetched_at: Utc::now(),
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Number of stored keys, fresh or not.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Per-key freshness, sorted by key.
    pub async fn snapshot(&self) -> Vec<CacheEntryStatus> {
        let entries = self.entries.read().await;
        let mut out: Vec<CacheEntryStatus> = entries
            .iter()
            .map(|(key, entry)| CacheEntryStatus {
                source_key: key.clone(),
                fetched_at: entry.fetched_at,
                fresh: entry.stored_at.elapsed() <= self.ttl,
            })
            .collect();
        out.sort_by(|a, b| a.source_key.cmp(&b.source_key));
        out
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
