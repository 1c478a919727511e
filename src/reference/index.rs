use std::collections::{HashMap, HashSet};

use super::record::{SymptomId, SymptomRecord};

/// Normalize a symptom term for lookup: trimmed, lowercased.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Exact-match lookup from normalized symptom text to its identifier.
///
/// Built once from the reference rows. When several rows carry the same
/// normalized text the first row's id wins, so resolution is stable for a
/// given dataset.
#[derive(Debug, Clone, Default)]
pub struct SymptomIndex {
    by_term: HashMap<String, SymptomId>,
    /// Raw symptom strings, deduplicated, in first-seen order.
    distinct: Vec<String>,
}

impl SymptomIndex {
    pub fn build(records: &[SymptomRecord]) -> Self {
        let mut by_term = HashMap::new();
        let mut seen = HashSet::new();
        let mut distinct = Vec::new();

        for record in records {
            by_term
                .entry(normalize_term(&record.symptom))
                .or_insert(record.symptom_id);
            if seen.insert(record.symptom.as_str()) {
                distinct.push(record.symptom.clone());
            }
        }

        Self { by_term, distinct }
    }

    /// Resolve a free-text symptom to its id. No fuzzy matching.
    pub fn resolve(&self, term: &str) -> Option<SymptomId> {
        self.by_term.get(&normalize_term(term)).copied()
    }

    pub fn distinct_symptoms(&self) -> &[String] {
        &self.distinct
    }

    /// Number of distinct normalized terms.
    pub fn len(&self) -> usize {
        self.by_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_term.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symptom: &str, id: SymptomId) -> SymptomRecord {
        SymptomRecord {
            symptom: symptom.into(),
            symptom_id: id,
            diagnosis_id: 100,
            diagnosis_index: 0,
            diagnosis_label: "flu".into(),
            weight: 1.0,
        }
    }

    #[test]
    fn resolves_case_and_whitespace_insensitively() {
        let index = SymptomIndex::build(&[record("Fever", 1), record("cough", 2)]);
        assert_eq!(index.resolve("fever"), Some(1));
        assert_eq!(index.resolve("  FEVER\t"), Some(1));
        assert_eq!(index.resolve("Cough "), Some(2));
    }

    #[test]
    fn normalization_is_idempotent_for_lookup() {
        let index = SymptomIndex::build(&[record(" Shortness of Breath ", 7)]);
        for term in ["shortness of breath", " Shortness Of Breath", "SHORTNESS OF BREATH  ", "nope"] {
            assert_eq!(index.resolve(term), index.resolve(&normalize_term(term)));
        }
    }

    #[test]
    fn no_fuzzy_matching() {
        let index = SymptomIndex::build(&[record("fever", 1)]);
        assert_eq!(index.resolve("fevers"), None);
        assert_eq!(index.resolve("feve"), None);
        assert_eq!(index.resolve(""), None);
    }

    #[test]
    fn first_row_wins_for_duplicate_terms() {
        let index = SymptomIndex::build(&[record("fever", 1), record("FEVER", 9)]);
        assert_eq!(index.resolve("fever"), Some(1));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn distinct_symptoms_keep_first_seen_order() {
        let index = SymptomIndex::build(&[
            record("fever", 1),
            record("cough", 2),
            record("fever", 1),
            record("rash", 3),
        ]);
        assert_eq!(index.distinct_symptoms(), &["fever", "cough", "rash"]);
    }
}
