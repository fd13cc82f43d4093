//! Confidence normalizer
//!
//! Maps aggregated evidence into a bounded confidence:
//!
//! 1. Claims with `|evidence| > decisive_threshold` are decisive; the rest
//!    are inconclusive and excluded.
//! 2. No decisive claim yields exactly 0.0.
//! 3. Otherwise `confidence = tanh(mean |evidence| over decisive claims)`,
//!    rounded to three decimals.
//!
//! `tanh` gives diminishing returns: each additional agreeing source moves
//! confidence less than the one before.

use crate::{ClaimId, ClaimScore};
use std::collections::BTreeMap;
use std::fmt;

/// Evidence magnitude a claim must exceed to be decisive (default: 0.25)
pub const DECISIVE_THRESHOLD: f64 = 0.25;

/// Errors raised when the normalizer is called outside its contract
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// No scores were supplied; the aggregator has not run for this round
    EmptyScores,

    /// An evidence score was NaN or infinite
    NonFinite {
        /// Offending claim
        claim_id: ClaimId,
    },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::EmptyScores => {
                write!(f, "Normalizer called before any claim was scored")
            }
            NormalizeError::NonFinite { claim_id } => {
                write!(f, "Evidence score for claim {} is not finite", claim_id)
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Whether an evidence score is decisive under `threshold`
pub fn is_decisive(evidence_score: f64, threshold: f64) -> bool {
    evidence_score.abs() > threshold
}

/// Round to three decimal places
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Claim-level confidence from a set of per-claim evidence scores
///
/// # Errors
///
/// Returns [`NormalizeError::EmptyScores`] for an empty map, which is
/// distinct from a legitimate confidence of 0.0.
pub fn normalize(
    scores: &BTreeMap<ClaimId, f64>,
    decisive_threshold: f64,
) -> Result<f64, NormalizeError> {
    if scores.is_empty() {
        return Err(NormalizeError::EmptyScores);
    }

    let mut decisive = Vec::new();
    for (claim_id, score) in scores {
        if !score.is_finite() {
            return Err(NormalizeError::NonFinite { claim_id: *claim_id });
        }
        if is_decisive(*score, decisive_threshold) {
            decisive.push(score.abs());
        }
    }

    if decisive.is_empty() {
        return Ok(0.0);
    }

    decisive.sort_by(f64::total_cmp);
    let average_strength = decisive.iter().sum::<f64>() / decisive.len() as f64;
    Ok(saturate(average_strength))
}

/// Saturating transform applied to an average strength
pub fn saturate(average_strength: f64) -> f64 {
    round3(average_strength.tanh())
}

/// Per-claim confidence: the saturated magnitude if decisive, else 0.0
pub fn claim_confidence(evidence_score: f64, decisive_threshold: f64) -> f64 {
    if evidence_score.is_finite() && is_decisive(evidence_score, decisive_threshold) {
        saturate(evidence_score.abs())
    } else {
        0.0
    }
}

/// Build the per-claim score list from an evidence map
pub fn claim_scores(scores: &BTreeMap<ClaimId, f64>, decisive_threshold: f64) -> Vec<ClaimScore> {
    scores
        .iter()
        .map(|(claim_id, evidence_score)| ClaimScore {
            claim_id: *claim_id,
            evidence_score: *evidence_score,
            confidence_score: claim_confidence(*evidence_score, decisive_threshold),
        })
        .collect()
}
