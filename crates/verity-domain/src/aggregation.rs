//! Evidence aggregator
//!
//! Folds per-source contributions into one signed evidence score per claim.
//! The score is unbounded: more corroborating sources produce a larger
//! signal, which the normalizer later saturates.

use crate::weighting::WeightingPolicy;
use crate::{Claim, ClaimId, SourceAssessment};
use std::collections::BTreeMap;

/// Evidence score for `claim_id` under the default weighting policy
///
/// Assessments for other claims are ignored.
pub fn aggregate<'a, I>(claim_id: ClaimId, assessments: I) -> f64
where
    I: IntoIterator<Item = &'a SourceAssessment>,
{
    aggregate_with(&WeightingPolicy::default(), claim_id, assessments)
}

/// Evidence score for `claim_id` under an explicit policy
pub fn aggregate_with<'a, I>(policy: &WeightingPolicy, claim_id: ClaimId, assessments: I) -> f64
where
    I: IntoIterator<Item = &'a SourceAssessment>,
{
    let contributions = assessments
        .into_iter()
        .filter(|a| a.claim_id == claim_id)
        .map(|a| policy.contribution(a))
        .collect();

    canonical_sum(contributions)
}

/// Evidence scores for every known claim
///
/// Claims without evidence score 0.0. Assessments referencing a claim
/// outside `claims` are skipped; callers are expected to have rejected
/// them earlier.
pub fn aggregate_all<'a, I>(
    policy: &WeightingPolicy,
    claims: &[Claim],
    assessments: I,
) -> BTreeMap<ClaimId, f64>
where
    I: IntoIterator<Item = &'a SourceAssessment>,
{
    let mut grouped: BTreeMap<ClaimId, Vec<f64>> =
        claims.iter().map(|c| (c.id, Vec::new())).collect();

    for assessment in assessments {
        if let Some(bucket) = grouped.get_mut(&assessment.claim_id) {
            bucket.push(policy.contribution(assessment));
        }
    }

    grouped
        .into_iter()
        .map(|(id, contributions)| (id, canonical_sum(contributions)))
        .collect()
}

/// Sum in a fixed order so the result does not depend on input order
fn canonical_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    // Iterator::sum over f64 starts from -0.0
    values.into_iter().fold(0.0, |acc, v| acc + v)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Bias, Stance};
    use proptest::prelude::*;

    fn assessment_strategy(claim_id: ClaimId) -> impl Strategy<Value = SourceAssessment> {
        (
            0.0f64..=1.0,
            0.0f64..=1.0,
            -1.0f64..=1.0,
            prop_oneof![Just(Stance::Supports), Just(Stance::Opposes), Just(Stance::Neutral)],
        )
            .prop_map(move |(credibility, recency, bias, stance)| SourceAssessment {
                domain: "p.org".to_string(),
                claim_id,
                credibility_score: credibility,
                bias: Bias::Score(bias),
                recency_score: recency,
                stance,
                reasoning: String::new(),
            })
    }

    proptest! {
        /// Re-ordering the assessment set never changes the score, bit for bit
        #[test]
        fn test_permutation_invariance(
            (set, shuffled) in prop::collection::vec(assessment_strategy(ClaimId::from_value(5)), 0..20)
                .prop_flat_map(|v| {
                    let original = v.clone();
                    (Just(original), Just(v).prop_shuffle())
                })
        ) {
            let id = ClaimId::from_value(5);
            prop_assert_eq!(aggregate(id, &set).to_bits(), aggregate(id, &shuffled).to_bits());
        }

        /// The score is bounded by the number of contributing sources
        #[test]
        fn test_magnitude_bounded_by_count(
            set in prop::collection::vec(assessment_strategy(ClaimId::from_value(5)), 0..20)
        ) {
            let score = aggregate(ClaimId::from_value(5), &set);
            prop_assert!(score.abs() <= set.len() as f64 + 1e-9);
        }
    }
}
