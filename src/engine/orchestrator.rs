//! # engine::orchestrator
//!
//! **Fetch Orchestrator**: fan-out / fan-in over the recipe's ingredients.
//!
//! * One tokio task per ingredient, each with its own timeouts. No task can
//!   cancel a sibling.
//! * Every task writes to the slot at its ingredient's index, so the result
//!   keeps declaration order no matter which fetch finishes first.
//! * Fail-after-join: all tasks run to completion, then the first error in
//!   declaration order fails the whole batch. Quotes fetched successfully
//!   along the way stay in the shared cache.
//! * The `JoinSet` aborts outstanding tasks if the request future is dropped,
//!   so no fetch outlives the request that started it.

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::debug;

use super::fetcher::{FetchError, RetryingFetcher};
use crate::error::AppError;
use crate::models::{Ingredient, PriceQuote};

/// Fetch one quote per ingredient, concurrently. `quotes[i]` belongs to
/// `ingredients[i]`.
pub async fn fetch_all(
    fetcher: &RetryingFetcher,
    ingredients: &[Ingredient],
) -> Result<Vec<PriceQuote>, AppError> {
    let mut tasks = JoinSet::new();
    for (index, ingredient) in ingredients.iter().enumerate() {
        let fetcher = fetcher.clone();
        let source_key = ingredient.source_key.clone();
        tasks.spawn(async move { (index, fetcher.fetch_with_policy(&source_key).await) });
    }

    let mut slots: Vec<Option<Result<PriceQuote, FetchError>>> =
        (0..ingredients.len()).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) =
            joined.map_err(|e| AppError::Internal(anyhow!("price fetch task failed: {e}")))?;
        let ingredient = &ingredients[index];
        debug!(
            ingredient = %ingredient.name,
            kind = ingredient.kind.label(),
            ok = outcome.is_ok(),
            "Price fetch finished"
        );
        slots[index] = Some(outcome);
    }

    let mut quotes = Vec::with_capacity(ingredients.len());
    for (ingredient, slot) in ingredients.iter().zip(slots) {
        match slot {
            Some(Ok(quote)) => quotes.push(quote),
            Some(Err(error)) => {
                return Err(AppError::Fetch {
                    ingredient: ingredient.name.clone(),
                    error,
                })
            }
            None => {
                return Err(AppError::Internal(anyhow!(
                    "no fetch result for {}",
                    ingredient.name
                )))
            }
        }
    }

    Ok(quotes)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
