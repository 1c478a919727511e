//! Terminology lookup endpoint.
//!
//! `POST /get_data`: body `{"term": ".."}`. Searches ICD-9-CM codes for
//! the term and attaches the MedlinePlus summary for each code.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LookupRequest};
use crate::lookup::CodeSummary;

pub async fn get_data(
    State(ctx): State<ApiContext>,
    body: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<Vec<CodeSummary>>, ApiError> {
    let term = body
        .ok()
        .and_then(|Json(req)| req.term)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No search term provided".into()))?;

    let results = ctx.lookup.lookup(&term).await?;
    if results.is_empty() {
        return Err(ApiError::NotFound(format!("No ICD-9 codes found for '{term}'")));
    }

    tracing::info!(codes = results.len(), "Terminology lookup served");
    Ok(Json(results))
}
