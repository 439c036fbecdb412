//! JSON assessment endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::assessment::{Assessment, Measurements};

/// `POST /api/assess`: classify one measurement set and return advice.
pub async fn evaluate(
    State(ctx): State<ApiContext>,
    payload: Result<Json<Measurements>, JsonRejection>,
) -> Result<Json<Assessment>, ApiError> {
    let Json(measurements) = payload?;
    let assessment = ctx.assessor.assess(measurements).await?;
    Ok(Json(assessment))
}
