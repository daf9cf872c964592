//! # routes::calc
//!
//! Axum route handlers for the **calculator API**.
//!
//! ## Endpoints
//!
//! | Method | Path          | Description                                     |
//! |--------|---------------|-------------------------------------------------|
//! | GET    | `/api/calc`   | Scale the recipe and price it with live quotes  |
//! | GET    | `/api/recipe` | The loaded recipe (ingredients and proportions) |

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{engine, error::AppError, state::SharedState};

// ─── GET /api/calc ────────────────────────────────────────────────────────────

/// Query string of `/api/calc`. Both values arrive as free text from an HTML
/// form: only a leading integer is read (`"12 personas"` is 12), and anything
/// without one counts as 0 and is then rejected by validation.
#[derive(Debug, Deserialize)]
pub struct CalcQuery {
    personas: Option<String>,
    gpp: Option<String>,
}

fn lenient_int(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else { return 0 };
    let raw = raw.trim();
    let sign = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[sign..].bytes().take_while(u8::is_ascii_digit).count();
    raw[..sign + digits].parse().unwrap_or(0)
}

/// ### Response
/// * `200 OK` with a [`crate::models::CalculationResult`]
/// * `400` when either number is missing or not positive
/// * `502` when any ingredient's price could not be fetched
pub async fn calculate(
    State(state): State<SharedState>,
    Query(query): Query<CalcQuery>,
) -> Result<impl IntoResponse, AppError> {
    let servings = lenient_int(query.personas.as_deref());
    let grams_per_serving = lenient_int(query.gpp.as_deref());

    let result = engine::calculate(&state, servings, grams_per_serving).await?;
    Ok((StatusCode::OK, Json(result)))
}

// ─── GET /api/recipe ──────────────────────────────────────────────────────────

pub async fn get_recipe(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.recipe.as_ref().clone())
}
