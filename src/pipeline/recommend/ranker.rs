use std::collections::HashSet;

use super::types::{RankOptions, RankedDiagnosis, ScoredCandidate};
use crate::config::MAX_TOP_K;

/// Order by predicted score (highest first) and keep the top `k`, never
/// more than `MAX_TOP_K`.
///
/// Ties keep the incoming order, i.e. the candidate generator's weight order.
/// A NaN score sorts last.
pub fn rank(mut scored: Vec<ScoredCandidate>, options: RankOptions) -> Vec<RankedDiagnosis> {
    scored.sort_by(|a, b| {
        let (a, b) = (a.predicted_score, b.predicted_score);
        a.is_nan().cmp(&b.is_nan()).then_with(|| b.total_cmp(&a))
    });

    if options.dedupe_labels {
        let mut seen = HashSet::new();
        scored.retain(|c| seen.insert(c.diagnosis_label.clone()));
    }

    scored.truncate(options.top_k.min(MAX_TOP_K));
    scored.into_iter().map(RankedDiagnosis::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sc(label: &str, score: f32) -> ScoredCandidate {
        ScoredCandidate {
            diagnosis_label: label.into(),
            predicted_score: score,
        }
    }

    fn opts(top_k: usize, dedupe_labels: bool) -> RankOptions {
        RankOptions { top_k, dedupe_labels }
    }

    #[test]
    fn sorts_descending() {
        let out = rank(vec![sc("a", 0.1), sc("b", 0.9), sc("c", 0.5)], RankOptions::default());
        let labels: Vec<_> = out.iter().map(|d| d.diagnosis_label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
    }

    #[test]
    fn truncates_to_top_k() {
        let input: Vec<_> = (0..25).map(|i| sc(&format!("d{i}"), i as f32)).collect();
        let out = rank(input, RankOptions::default());
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].diagnosis_label, "d24");
        assert!(out.windows(2).all(|w| w[0].predicted_score >= w[1].predicted_score));
    }

    #[test]
    fn oversized_top_k_is_capped() {
        let input: Vec<_> = (0..30).map(|i| sc(&format!("d{i}"), i as f32)).collect();
        let out = rank(input, opts(25, false));
        assert_eq!(out.len(), MAX_TOP_K);
        assert_eq!(out[0].diagnosis_label, "d29");
    }

    #[test]
    fn nan_score_sorts_last() {
        let out = rank(vec![sc("nan", f32::NAN), sc("low", -1.0), sc("high", 2.0)], RankOptions::default());
        let labels: Vec<_> = out.iter().map(|d| d.diagnosis_label.as_str()).collect();
        assert_eq!(labels, vec!["high", "low", "nan"]);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let out = rank(vec![sc("first", 0.5), sc("second", 0.5), sc("third", 0.5)], opts(2, false));
        assert_eq!(out[0].diagnosis_label, "first");
        assert_eq!(out[1].diagnosis_label, "second");
    }

    #[test]
    fn duplicate_labels_kept_by_default() {
        let out = rank(vec![sc("flu", 0.9), sc("flu", 0.7), sc("cold", 0.8)], RankOptions::default());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn dedupe_keeps_best_per_label_before_truncation() {
        let out = rank(
            vec![sc("flu", 0.7), sc("flu", 0.9), sc("cold", 0.8), sc("rash", 0.1)],
            opts(2, true),
        );
        assert_eq!(
            out,
            vec![
                RankedDiagnosis { diagnosis_label: "flu".into(), predicted_score: 0.9 },
                RankedDiagnosis { diagnosis_label: "cold".into(), predicted_score: 0.8 },
            ]
        );
    }

    #[test]
    fn negative_scores_rank_below_positive() {
        let out = rank(vec![sc("neg", -0.2), sc("pos", 0.1)], RankOptions::default());
        assert_eq!(out[0].diagnosis_label, "pos");
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(rank(Vec::new(), RankOptions::default()).is_empty());
    }
}
