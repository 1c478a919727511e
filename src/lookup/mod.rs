//! External terminology lookups behind `POST /get_data`.
//!
//! Two public NLM services: Clinical Tables (ICD-9-CM code search) and
//! MedlinePlus Connect (consumer-health summaries per code). Neither
//! touches the prediction pipeline.

pub mod client;
pub mod medlineplus;

use thiserror::Error;

pub use client::{format_icd9_code, CodeSummary, LookupClient, MedlinePlusData};
pub use medlineplus::{MedlinePlusEntry, MedlinePlusSummary};

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("{service} returned status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::HttpClient(err.to_string())
    }
}
