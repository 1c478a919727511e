//! Symptom → diagnosis recommendation pipeline.
//!
//! Linear chain, no branching back:
//! resolve → candidates → score → rank.
//! Every stage is a pure function over the shared snapshot; failures abort
//! the remaining stages and surface as `RecommendError`.

pub mod candidates;
pub mod orchestrator;
pub mod ranker;
pub mod resolve;
pub mod scorer;
pub mod types;

use thiserror::Error;

use crate::model::ModelError;

pub use orchestrator::recommend;
pub use types::{Candidate, RankOptions, RankedDiagnosis, Recommendation, ResolvedSymptom, ScoredCandidate};

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("No symptoms provided")]
    NoSymptoms,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl RecommendError {
    /// Stable, caller-facing description. Never includes internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NoSymptoms => "No symptoms provided",
            Self::Model(_) => "Prediction model unavailable",
        }
    }
}
