//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::lookup::LookupClient;
use crate::pipeline::recommend::RankedDiagnosis;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub lookup: LookupClient,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>, lookup: LookupClient) -> Self {
        Self { core, lookup }
    }
}

// ═══════════════════════════════════════════════════════════
// /predict/ wire types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

pub const MESSAGE_SUCCESS: &str = "Success";
pub const MESSAGE_ERROR: &str = "Error";

/// `/predict/` response body. Same shape on success and failure; `error`
/// is present only on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub result: Vec<PredictedDiagnosis>,
    pub value_input: Vec<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictedDiagnosis {
    pub diagnose: String,
    pub prediction: f32,
}

impl From<RankedDiagnosis> for PredictedDiagnosis {
    fn from(d: RankedDiagnosis) -> Self {
        Self {
            diagnose: d.diagnosis_label,
            prediction: d.predicted_score,
        }
    }
}

impl PredictResponse {
    pub fn success(result: Vec<RankedDiagnosis>, value_input: Vec<String>) -> Self {
        Self {
            result: result.into_iter().map(PredictedDiagnosis::from).collect(),
            value_input,
            message: MESSAGE_SUCCESS.to_string(),
            error: None,
        }
    }

    pub fn failure(value_input: Vec<String>, error: &str) -> Self {
        Self {
            result: Vec::new(),
            value_input,
            message: MESSAGE_ERROR.to_string(),
            error: Some(error.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// /get_data wire types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub term: Option<String>,
}
