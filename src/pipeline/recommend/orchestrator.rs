use super::types::{RankOptions, Recommendation};
use super::{candidates, ranker, resolve, scorer, RecommendError};
use crate::model::AffinityModel;
use crate::reference::ReferenceDataset;

/// Run the full pipeline for one request.
///
/// A list that is empty or holds only blank terms is rejected before any
/// stage runs. Unresolved terms are excluded; if none resolve the result is
/// an empty recommendation, not an error.
pub fn recommend<S: AsRef<str>>(
    dataset: &ReferenceDataset,
    model: &dyn AffinityModel,
    terms: &[S],
    options: RankOptions,
) -> Result<Recommendation, RecommendError> {
    if terms.iter().all(|t| t.as_ref().trim().is_empty()) {
        return Err(RecommendError::NoSymptoms);
    }

    let resolved = resolve::resolve_terms(dataset, terms);
    let ids = resolve::resolved_ids(&resolved);

    let candidates = candidates::generate(dataset.records(), &ids);
    let outcome = scorer::score(model, &candidates)?;
    let diagnoses = ranker::rank(outcome.scored, options);

    let recommendation = Recommendation {
        diagnoses,
        resolved,
        candidates_considered: candidates.len(),
        out_of_vocabulary: outcome.out_of_vocabulary,
    };

    tracing::info!(
        terms = terms.len(),
        resolved_ids = ids.len(),
        unresolved = recommendation.unresolved().count(),
        candidates = recommendation.candidates_considered,
        out_of_vocabulary = recommendation.out_of_vocabulary,
        returned = recommendation.diagnoses.len(),
        "Recommendation computed"
    );

    Ok(recommendation)
}
