//! # Discada: Live-Priced Recipe Cost Calculator
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐   GET /api/calc?personas&gpp   ┌──────────────────────────┐
//!  │  Frontend    │ ─────────────────────────────▶ │ engine::calculate        │
//!  │  (HTMX page) │ ◀───────── CalculationResult ── │  ├─ Order validation     │
//!  └──────────────┘                                │  ├─ orchestrator (×8)    │
//!                                                  │  │    └─ RetryingFetcher │──▶ price scraper
//!                                                  │  │          └─ PriceCache│    GET /price?url=
//!                                                  │  └─ calculator           │
//!                                                  └──────────────────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable                       | Default                        | Description                       |
//! |--------------------------------|--------------------------------|-----------------------------------|
//! | `BIND_ADDR`                    | `0.0.0.0:8080` (or `PORT`)     | Address Axum listens on           |
//! | `SCRAPER_URL`                  | hosted scraper `/price`        | Price source endpoint             |
//! | `SCRAPER_ACCEPT_INVALID_CERTS` | `false`                        | Relax TLS towards the scraper     |
//! | `CACHE_TTL_SECS`               | `300`                          | Price cache TTL                   |
//! | `FETCH_TIMEOUT_SECS`           | `60`                           | Per-attempt timeout               |
//! | `FETCH_ATTEMPTS`               | `3`                            | Attempts per ingredient           |
//! | `FETCH_BACKOFF_MS`             | `800`                          | Linear backoff base               |
//! | `FETCH_DEADLINE_SECS`          | unset                          | Whole-fetch bound per ingredient  |
//! | `RECIPE_PATH`                  | unset (built-in recipe)        | JSON recipe file                  |
//! | `RUST_LOG`                     | `discada=debug`                | Tracing filter                    |

use std::sync::Arc;

use anyhow::Context;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod config;
mod engine;
mod error;
mod models;
mod routes;
mod source;
mod state;

#[cfg(test)]
mod test_support;

use config::Config;
use source::ScraperClient;
use state::build_state;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional, prod can use real env vars) ───────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("discada=debug".parse()?)
            .add_directive("tower_http=info".parse()?))
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        DISCADA · Calculadora de Costos        ║
  ║        Rust + Axum  ·  Live Prices            ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Configuration + recipe (fail fast on anything invalid) ────────────
    let config = Config::from_env().context("Failed to load config")?;
    let recipe = config.load_recipe()?;

    info!(
        scraper  = %config.scraper_url,
        ttl      = ?config.cache_ttl,
        attempts = config.fetch.max_attempts,
        backoff  = ?config.fetch.base_delay,
        timeout  = ?config.fetch.attempt_timeout,
        "Price fetching configured"
    );

    // ── 4. Price source + shared state ───────────────────────────────────────
    let scraper = ScraperClient::new(
        &config.scraper_url,
        config.fetch.attempt_timeout,
        config.accept_invalid_certs,
    )?;
    let state = build_state(&config, recipe, Arc::new(scraper));

    // ── 5. CORS ──────────────────────────────────────────────────────────────
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 6. Router ────────────────────────────────────────────────────────────
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // ── 7. Bind & Serve ──────────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Discada server starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
