//! Reference symptom–diagnosis table and the symptom index built over it.
//!
//! Loaded once per snapshot and never mutated afterwards; every request
//! reads it through an `Arc`.

pub mod dataset;
pub mod index;
pub mod record;

use std::path::PathBuf;

use thiserror::Error;

pub use dataset::ReferenceDataset;
pub use index::{normalize_term, SymptomIndex};
pub use record::{DiagnosisId, SymptomId, SymptomRecord};

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference dataset not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Reference dataset contains no rows")]
    Empty,
}
