use super::types::{Candidate, ScoredCandidate};
use crate::model::{Affinity, AffinityModel, ModelError};

/// Scored candidates in incoming order, plus how many the model could not score.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreOutcome {
    pub scored: Vec<ScoredCandidate>,
    pub out_of_vocabulary: usize,
}

/// Apply the model to every candidate.
///
/// Out-of-vocabulary pairs are dropped so they can never outrank a real
/// score. Any other model failure aborts the whole batch.
pub fn score(model: &dyn AffinityModel, candidates: &[Candidate]) -> Result<ScoreOutcome, ModelError> {
    let mut outcome = ScoreOutcome {
        scored: Vec::with_capacity(candidates.len()),
        out_of_vocabulary: 0,
    };

    for candidate in candidates {
        match model.predict(candidate.symptom_id, candidate.diagnosis_id)? {
            Affinity::Score(predicted_score) => outcome.scored.push(ScoredCandidate {
                diagnosis_label: candidate.diagnosis_label.clone(),
                predicted_score,
            }),
            Affinity::OutOfVocabulary => {
                tracing::debug!(
                    symptom_id = candidate.symptom_id,
                    diagnosis_id = candidate.diagnosis_id,
                    "Candidate out of model vocabulary"
                );
                outcome.out_of_vocabulary += 1;
            }
        }
    }

    Ok(outcome)
}
