//! # state
//!
//! The calculator's **shared application state**, built once at startup and
//! handed to every Axum handler.
//!
//! ## Design Decisions
//!
//! * `Arc<AppState>` is cloned cheaply into every handler via
//!   `axum::extract::State`.
//! * The recipe is immutable and validated before the state is built.
//! * The [`PriceCache`] is the only mutable piece shared across requests; it
//!   carries its own `RwLock` internally and is also held by the fetcher.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::cache::PriceCache;
use crate::config::Config;
use crate::engine::fetcher::RetryingFetcher;
use crate::models::Recipe;
use crate::source::PriceSource;

// ─── AppState ─────────────────────────────────────────────────────────────────

pub struct AppState {
    pub recipe: Arc<Recipe>,

    /// Same cache the fetcher writes to; exposed for the health endpoint.
    pub cache: PriceCache,

    pub fetcher: RetryingFetcher,

    /// Calculations that produced a result.
    pub calc_count: AtomicU64,

    /// Calculations aborted by a price fetch failure.
    pub failure_count: AtomicU64,
}

impl AppState {
    pub fn new(config: &Config, recipe: Recipe, source: Arc<dyn PriceSource>) -> Self {
        let cache = PriceCache::new(config.cache_ttl);
        let fetcher = RetryingFetcher::new(source, cache.clone(), config.fetch.clone());

        Self {
            recipe: Arc::new(recipe),
            cache,
            fetcher,
            calc_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }
}

/// Convenience type alias so callers can write `SharedState` instead of the
/// full generic form.
pub type SharedState = Arc<AppState>;

/// Construct the shared application state and wrap it in an `Arc` ready for
/// injection into the Axum router.
pub fn build_state(config: &Config, recipe: Recipe, source: Arc<dyn PriceSource>) -> SharedState {
    Arc::new(AppState::new(config, recipe, source))
}
