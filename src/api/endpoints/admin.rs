//! Administrative endpoints.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::{CoreError, SnapshotSummary};

/// `POST /admin/reload`: re-read dataset and model, swap them in atomically.
///
/// Loading is blocking file I/O, so it runs on the blocking pool. Requests
/// already in flight finish against the snapshot they started with.
pub async fn reload(State(ctx): State<ApiContext>) -> Result<Json<SnapshotSummary>, ApiError> {
    let core = ctx.core.clone();
    let summary = tokio::task::spawn_blocking(move || core.reload())
        .await
        .map_err(|e| CoreError::Task(e.to_string()))??;

    Ok(Json(summary))
}

/// `GET /admin/snapshot`: describe the active snapshot.
pub async fn snapshot(State(ctx): State<ApiContext>) -> Result<Json<SnapshotSummary>, ApiError> {
    Ok(Json(ctx.core.snapshot()?.summary()))
}
