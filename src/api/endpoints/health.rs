//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::model_store::ModelInfo;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub advisor: &'static str,
    pub model: ModelInfo,
}

/// `GET /api/health`: liveness plus which model and advisor are serving.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        advisor: ctx.assessor.advisor_name(),
        model: (*ctx.model).clone(),
    })
}
