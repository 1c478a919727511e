use serde::Serialize;

use crate::config::DEFAULT_TOP_K;
use crate::reference::{DiagnosisId, SymptomId, SymptomRecord};

/// A request term after index lookup. `id` is `None` when no exact
/// normalized match exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymptom {
    pub text: String,
    pub id: Option<SymptomId>,
}

/// A reference row that survived the symptom filter for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub symptom_id: SymptomId,
    pub diagnosis_id: DiagnosisId,
    pub diagnosis_index: i64,
    pub diagnosis_label: String,
    pub weight: f64,
}

impl From<&SymptomRecord> for Candidate {
    fn from(record: &SymptomRecord) -> Self {
        Self {
            symptom_id: record.symptom_id,
            diagnosis_id: record.diagnosis_id,
            diagnosis_index: record.diagnosis_index,
            diagnosis_label: record.diagnosis_label.clone(),
            weight: record.weight,
        }
    }
}

/// A candidate the model could score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub diagnosis_label: String,
    pub predicted_score: f32,
}

/// One entry of the ranked result, in `/predict/` wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDiagnosis {
    #[serde(rename = "diagnose")]
    pub diagnosis_label: String,
    #[serde(rename = "prediction")]
    pub predicted_score: f32,
}

impl From<ScoredCandidate> for RankedDiagnosis {
    fn from(scored: ScoredCandidate) -> Self {
        Self {
            diagnosis_label: scored.diagnosis_label,
            predicted_score: scored.predicted_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    pub top_k: usize,
    /// Keep only the best-scoring row per label before truncating.
    pub dedupe_labels: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            dedupe_labels: false,
        }
    }
}

/// Output of one pipeline run. Only `diagnoses` goes over the wire; the
/// counters feed logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub diagnoses: Vec<RankedDiagnosis>,
    pub resolved: Vec<ResolvedSymptom>,
    pub candidates_considered: usize,
    pub out_of_vocabulary: usize,
}

impl Recommendation {
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.resolved
            .iter()
            .filter(|r| r.id.is_none())
            .map(|r| r.text.as_str())
    }
}
