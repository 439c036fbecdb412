//! API endpoint handlers.
//!
//! - `form`: HTML form and result page
//! - `assess`: JSON assessment
//! - `health`: liveness and loaded-model report

pub mod assess;
pub mod form;
pub mod health;

use axum::http::Uri;

use crate::api::error::ApiError;

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
