use std::collections::HashSet;

use super::types::ResolvedSymptom;
use crate::reference::{ReferenceDataset, SymptomId};

/// Resolve every request term against the symptom index, keeping input order.
pub fn resolve_terms<S: AsRef<str>>(dataset: &ReferenceDataset, terms: &[S]) -> Vec<ResolvedSymptom> {
    terms
        .iter()
        .map(|term| {
            let text = term.as_ref();
            ResolvedSymptom {
                text: text.to_string(),
                id: dataset.resolve(text),
            }
        })
        .collect()
}

/// Ids to filter on. Unresolved terms are dropped here and nowhere else.
pub fn resolved_ids(resolved: &[ResolvedSymptom]) -> HashSet<SymptomId> {
    resolved.iter().filter_map(|r| r.id).collect()
}
