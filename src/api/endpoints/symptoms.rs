//! Symptom listing endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `GET /get_all_symptoms`: every distinct symptom string in the reference table.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<String>>, ApiError> {
    let snapshot = ctx.core.snapshot()?;
    Ok(Json(snapshot.dataset.distinct_symptoms().to_vec()))
}
