//! Diagnosis prediction endpoint.
//!
//! `POST /predict/`: body `{"symptoms": [..]}`. Always answers with the
//! `PredictResponse` shape; the status code tells validation failures (400)
//! apart from model failures (500).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::types::{ApiContext, PredictRequest, PredictResponse};
use crate::pipeline::recommend::{self, RecommendError};

const INVALID_BODY: &str = "Invalid request body";
const STATE_UNAVAILABLE: &str = "Prediction service unavailable";

pub async fn predict(
    State(ctx): State<ApiContext>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> (StatusCode, Json<PredictResponse>) {
    // The echoed input is fixed here, before anything can fail.
    let symptoms = match body {
        Ok(Json(req)) => req.symptoms,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected /predict/ body");
            return (
                StatusCode::BAD_REQUEST,
                Json(PredictResponse::failure(Vec::new(), INVALID_BODY)),
            );
        }
    };

    let snapshot = match ctx.core.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "Snapshot unavailable");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PredictResponse::failure(symptoms, STATE_UNAVAILABLE)),
            );
        }
    };

    match recommend::recommend(
        &snapshot.dataset,
        snapshot.model.as_ref(),
        symptoms.as_slice(),
        ctx.core.rank_options,
    ) {
        Ok(recommendation) => (
            StatusCode::OK,
            Json(PredictResponse::success(recommendation.diagnoses, symptoms)),
        ),
        Err(e) => {
            let status = match &e {
                RecommendError::NoSymptoms => StatusCode::BAD_REQUEST,
                RecommendError::Model(_) => {
                    tracing::error!(error = %e, "Prediction failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, Json(PredictResponse::failure(symptoms, e.public_message())))
        }
    }
}
