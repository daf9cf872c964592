//! # engine
//!
//! The price-acquisition pipeline and the calculation it feeds.
//!
//! ```text
//! calculate(servings, gpp)
//!     │
//!     ├─ Order::new            validation, before any network work
//!     ├─ orchestrator::fetch_all
//!     │      └─ one task per ingredient → RetryingFetcher (cache-first)
//!     └─ calculator::assemble  pure scaling + costing
//! ```

pub mod calculator;
pub mod fetcher;
pub mod orchestrator;
pub mod pricing;

use std::sync::atomic::Ordering;

use tracing::{error, info};

use crate::error::AppError;
use crate::models::CalculationResult;
use crate::state::AppState;
use calculator::Order;

/// Public calculation entry point consumed by the HTTP layer.
pub async fn calculate(
    state: &AppState,
    servings: i64,
    grams_per_serving: i64,
) -> Result<CalculationResult, AppError> {
    let order = Order::new(servings, grams_per_serving)?;

    let quotes = match orchestrator::fetch_all(&state.fetcher, &state.recipe.ingredients).await {
        Ok(quotes) => quotes,
        Err(e) => {
            state.failure_count.fetch_add(1, Ordering::Relaxed);
            error!(servings, grams_per_serving, error = %e, "Price fetch failed, calculation aborted");
            return Err(e);
        }
    };

    let result = calculator::assemble(order, &state.recipe, &quotes);
    state.calc_count.fetch_add(1, Ordering::Relaxed);

    info!(
        servings,
        grams_per_serving,
        total_grams = result.total_grams,
        total_cost = result.total_cost,
        currency = %result.currency,
        "Calculation complete"
    );

    Ok(result)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
