//! HTTP surface of the calculator.

pub mod calc;
pub mod health;

use axum::{routing::get, Router};

use crate::state::SharedState;

/// All API routes, without middleware. `main` adds tracing and CORS.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/calc",   get(calc::calculate))
        .route("/api/recipe", get(calc::get_recipe))
        .route("/api/health", get(health::health_check))
        .with_state(state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
