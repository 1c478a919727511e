use std::collections::HashSet;

use super::types::Candidate;
use crate::reference::{SymptomId, SymptomRecord};

/// Select reference rows whose symptom matches ANY requested id.
///
/// Exact duplicate rows (same symptom, diagnosis and diagnosis index) are
/// collapsed to their first occurrence. The result is ordered by weight,
/// highest first; equal weights keep dataset order.
pub fn generate(records: &[SymptomRecord], ids: &HashSet<SymptomId>) -> Vec<Candidate> {
    if ids.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut candidates: Vec<Candidate> = records
        .iter()
        .filter(|r| ids.contains(&r.symptom_id))
        .filter(|r| seen.insert((r.symptom_id, r.diagnosis_id, r.diagnosis_index)))
        .map(Candidate::from)
        .collect();

    // `sort_by` is stable, which is what preserves dataset order on ties.
    // `total_cmp` alone would put positive NaN first; NaN goes last instead.
    candidates.sort_by(|a, b| {
        let (a, b) = (a.weight, b.weight);
        a.is_nan().cmp(&b.is_nan()).then_with(|| b.total_cmp(&a))
    });
    candidates
}
