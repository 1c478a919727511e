//! Pretrained latent-factor model: the scoring seam of the recommender.
//!
//! The pipeline only sees `AffinityModel`; `FactorModel` is the production
//! implementation loaded from the exported ALS artifact.

pub mod factor;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::reference::{DiagnosisId, SymptomId};

pub use factor::FactorModel;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact unavailable: {0}")]
    Unavailable(PathBuf),

    #[error("I/O error reading model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model artifact could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model artifact malformed: {0}")]
    Malformed(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Outcome of scoring one (symptom, diagnosis) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Affinity {
    Score(f32),
    /// One of the ids has no learned latent vector.
    OutOfVocabulary,
}

/// Summary of a loaded model, for logs and the admin endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub rank: usize,
    pub symptoms: usize,
    pub diagnoses: usize,
}

/// A read-only model shared by all requests.
pub trait AffinityModel: Send + Sync {
    fn predict(
        &self,
        symptom_id: SymptomId,
        diagnosis_id: DiagnosisId,
    ) -> Result<Affinity, ModelError>;

    fn describe(&self) -> ModelInfo;
}
