//! # error
//!
//! Centralised application error type.
//!
//! [`crate::engine::calculate`] and every handler return
//! `Result<_, AppError>`. Axum's `IntoResponse` impl converts these into
//! structured JSON error bodies so the frontend always gets a
//! machine-readable response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::fetcher::FetchError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Servings / grams per serving rejected before any network work.
    #[error("Invalid order: {0}")]
    Validation(String),

    /// One ingredient's price could not be fetched; the whole calculation is
    /// discarded.
    #[error("{ingredient}: {error}")]
    Fetch { ingredient: String, error: FetchError },

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Name of the ingredient that failed, for fetch failures.
    pub fn ingredient(&self) -> Option<&str> {
        match self {
            AppError::Fetch { ingredient, .. } => Some(ingredient),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "ok":         false,
            "error":      self.to_string(),
            "ingredient": self.ingredient(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;
    use crate::source::SourceError;

    #[test]
    fn test_fetch_error_names_cause_once() {
        let err = AppError::Fetch {
            ingredient: "Chorizo".into(),
            error: FetchError::Exhausted { attempts: 3, last: SourceError::Status(500) },
        };

        let message = err.to_string();
        assert_eq!(
            message,
            "Chorizo: gave up after 3 attempt(s): price source returned HTTP 500"
        );
        assert!(err.source().is_none());
        assert_eq!(message.matches("HTTP 500").count(), 1);
    }

    #[test]
    fn test_status_codes() {
        let fetch = AppError::Fetch {
            ingredient: "Cerveza".into(),
            error: FetchError::DeadlineExceeded(std::time::Duration::from_secs(30)),
        };
        assert_eq!(fetch.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Validation("servings".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
