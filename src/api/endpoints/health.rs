//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub generation: u64,
    pub version: &'static str,
}

/// `GET /health`: liveness plus the active snapshot generation.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let snapshot = ctx.core.snapshot()?;

    Ok(Json(HealthResponse {
        status: "ok",
        generation: snapshot.generation,
        version: crate::config::APP_VERSION,
    }))
}
