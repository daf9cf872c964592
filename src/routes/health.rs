//! # routes::health
//!
//! `GET /api/health`: counters and cache freshness for uptime checks.

use std::sync::atomic::Ordering;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::SharedState;

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let calculations = state.calc_count.load(Ordering::Relaxed);
    let failures = state.failure_count.load(Ordering::Relaxed);
    let sources = state.cache.snapshot().await;
    let entries = sources.len();

    Json(json!({
        "ok":           true,
        "calculations": calculations,
        "failures":     failures,
        "cache": {
            "ttl_secs": state.cache.ttl().as_secs(),
            "entries":  entries,
            "sources":  sources,
        },
    }))
}
