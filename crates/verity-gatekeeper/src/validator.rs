//! Assessment screening logic

use crate::{GatekeeperError, ValidationConfig};
use std::fmt;
use tracing::{debug, warn};
use verity_domain::{normalize_domain, Bias, Claim, ClaimId, SourceAssessment};

/// Result of screening one assessment
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the assessment may enter the ledger
    pub status: ValidationStatus,

    /// The assessment after normalization and clamping
    pub assessment: SourceAssessment,

    /// Rejection reasons (empty when accepted)
    pub reasons: Vec<RejectionReason>,

    /// Values that were clamped into range
    pub adjustments: Vec<Adjustment>,
}

impl ValidationResult {
    /// Whether the assessment was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }

    /// The screened assessment, or an error listing every rejection reason
    pub fn into_result(self) -> Result<SourceAssessment, GatekeeperError> {
        if self.is_accepted() {
            return Ok(self.assessment);
        }
        let reasons: Vec<String> = self.reasons.iter().map(ToString::to_string).collect();
        Err(GatekeeperError::Rejected(reasons.join("; ")))
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Assessment accepted (possibly with adjustments)
    Accepted,

    /// Assessment rejected
    Rejected,
}

/// Numeric field of an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// credibility_score
    Credibility,
    /// recency_score
    Recency,
    /// continuous bias score
    BiasScore,
}

impl Field {
    fn bounds(&self) -> (f64, f64) {
        match self {
            Field::Credibility | Field::Recency => (0.0, 1.0),
            Field::BiasScore => (-1.0, 1.0),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Credibility => "credibility_score",
            Field::Recency => "recency_score",
            Field::BiasScore => "bias score",
        };
        f.write_str(name)
    }
}

/// A value moved to the nearest bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    /// Field that was clamped
    pub field: Field,
    /// Value as reported by the evaluator
    pub original: f64,
    /// Value after clamping
    pub clamped: f64,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} clamped to {}", self.field, self.original, self.clamped)
    }
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Assessment references a claim outside the session
    UnknownClaim {
        /// Claim the assessment pointed at
        claim_id: ClaimId,
    },

    /// NaN or infinite value
    NonFinite {
        /// Offending field
        field: Field,
    },

    /// Value outside its range while clamping is disabled
    OutOfRange {
        /// Offending field
        field: Field,
        /// Reported value
        value: f64,
    },

    /// Domain is empty after normalization
    EmptyDomain,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::UnknownClaim { claim_id } => {
                write!(f, "assessment references unknown claim {}", claim_id)
            }
            RejectionReason::NonFinite { field } => write!(f, "{} is not finite", field),
            RejectionReason::OutOfRange { field, value } => {
                let (lo, hi) = field.bounds();
                write!(f, "{} {} is outside [{}, {}]", field, value, lo, hi)
            }
            RejectionReason::EmptyDomain => f.write_str("assessment has an empty domain"),
        }
    }
}

/// The Gatekeeper screens assessments before they are stored
#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Screen one assessment against the session's claims
    ///
    /// Rejection never panics or aborts; the caller decides what to do with
    /// a rejected result.
    pub fn screen(&self, mut assessment: SourceAssessment, claims: &[Claim]) -> ValidationResult {
        let mut reasons = Vec::new();
        let mut adjustments = Vec::new();

        if !claims.iter().any(|c| c.id == assessment.claim_id) {
            reasons.push(RejectionReason::UnknownClaim {
                claim_id: assessment.claim_id,
            });
        }

        if self.config.normalize_domains {
            assessment.domain = normalize_domain(&assessment.domain);
        }
        if assessment.domain.trim().is_empty() {
            reasons.push(RejectionReason::EmptyDomain);
        }

        if let Some(value) = self.check(Field::Credibility, assessment.credibility_score, &mut reasons, &mut adjustments) {
            assessment.credibility_score = value;
        }
        if let Some(value) = self.check(Field::Recency, assessment.recency_score, &mut reasons, &mut adjustments) {
            assessment.recency_score = value;
        }
        if let Bias::Score(score) = assessment.bias {
            if let Some(value) = self.check(Field::BiasScore, score, &mut reasons, &mut adjustments) {
                assessment.bias = Bias::Score(value);
            }
        }

        let limit = self.config.max_reasoning_chars;
        if limit > 0 && assessment.reasoning.chars().count() > limit {
            assessment.reasoning = assessment.reasoning.chars().take(limit).collect();
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        match status {
            ValidationStatus::Accepted if !adjustments.is_empty() => {
                warn!(
                    domain = %assessment.domain,
                    claim_id = %assessment.claim_id,
                    adjustments = adjustments.len(),
                    "Clamped out-of-range assessment values"
                );
            }
            ValidationStatus::Rejected => {
                debug!(
                    domain = %assessment.domain,
                    claim_id = %assessment.claim_id,
                    reasons = reasons.len(),
                    "Assessment rejected"
                );
            }
            _ => {}
        }

        ValidationResult {
            status,
            assessment,
            reasons,
            adjustments,
        }
    }

    /// Range-check a value; returns the replacement when it was clamped
    fn check(
        &self,
        field: Field,
        value: f64,
        reasons: &mut Vec<RejectionReason>,
        adjustments: &mut Vec<Adjustment>,
    ) -> Option<f64> {
        if !value.is_finite() {
            reasons.push(RejectionReason::NonFinite { field });
            return None;
        }

        let (lo, hi) = field.bounds();
        if (lo..=hi).contains(&value) {
            return None;
        }

        if !self.config.clamp_out_of_range {
            reasons.push(RejectionReason::OutOfRange { field, value });
            return None;
        }

        let clamped = value.clamp(lo, hi);
        adjustments.push(Adjustment {
            field,
            original: value,
            clamped,
        });
        Some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{BiasLabel, Stance};

    fn claim() -> Claim {
        Claim::new("The Eiffel Tower is in Paris.")
    }

    fn assessment(claim_id: ClaimId) -> SourceAssessment {
        SourceAssessment {
            domain: "britannica.com".to_string(),
            claim_id,
            credibility_score: 0.9,
            bias: Bias::Label(BiasLabel::Center),
            recency_score: 0.8,
            stance: Stance::Supports,
            reasoning: "Encyclopedia entry places it on the Champ de Mars.".to_string(),
        }
    }

    #[test]
    fn test_valid_assessment() {
        let gatekeeper = Gatekeeper::default();
        let claim = claim();
        let result = gatekeeper.screen(assessment(claim.id), &[claim]);

        assert_eq!(result.status, ValidationStatus::Accepted);
        assert!(result.reasons.is_empty());
        assert!(result.adjustments.is_empty());
    }

    #[test]
    fn test_unknown_claim_rejected() {
        let gatekeeper = Gatekeeper::default();
        let stranger = ClaimId::new();
        let result = gatekeeper.screen(assessment(stranger), &[claim()]);

        assert_eq!(result.status, ValidationStatus::Rejected);
        assert_eq!(
            result.reasons,
            vec![RejectionReason::UnknownClaim { claim_id: stranger }]
        );
    }

    #[test]
    fn test_unknown_claim_rejected_under_every_preset() {
        let stranger = ClaimId::new();
        for config in [
            ValidationConfig::default(),
            ValidationConfig::permissive(),
            ValidationConfig::strict(),
        ] {
            let result = Gatekeeper::new(config).screen(assessment(stranger), &[claim()]);
            assert!(!result.is_accepted());
        }
    }

    #[test]
    fn test_clamps_out_of_range() {
        let gatekeeper = Gatekeeper::default();
        let claim = claim();
        let mut raw = assessment(claim.id);
        raw.credibility_score = 1.3;
        raw.recency_score = -0.2;
        raw.bias = Bias::Score(-4.0);

        let result = gatekeeper.screen(raw, &[claim]);

        assert!(result.is_accepted());
        assert_eq!(result.assessment.credibility_score, 1.0);
        assert_eq!(result.assessment.recency_score, 0.0);
        assert_eq!(result.assessment.bias, Bias::Score(-1.0));
        assert_eq!(result.adjustments.len(), 3);
        assert_eq!(result.adjustments[0].original, 1.3);
    }

    #[test]
    fn test_strict_rejects_out_of_range() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict());
        let claim = claim();
        let mut raw = assessment(claim.id);
        raw.credibility_score = 1.3;

        let result = gatekeeper.screen(raw, &[claim]);

        assert_eq!(result.status, ValidationStatus::Rejected);
        match &result.reasons[0] {
            RejectionReason::OutOfRange { field, value } => {
                assert_eq!(*field, Field::Credibility);
                assert_eq!(*value, 1.3);
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected_even_when_clamping() {
        let gatekeeper = Gatekeeper::default();
        let claim = claim();
        let mut raw = assessment(claim.id);
        raw.recency_score = f64::NAN;

        let result = gatekeeper.screen(raw, &[claim]);

        assert_eq!(result.status, ValidationStatus::Rejected);
        assert_eq!(
            result.reasons,
            vec![RejectionReason::NonFinite { field: Field::Recency }]
        );
    }

    #[test]
    fn test_domain_normalized() {
        let gatekeeper = Gatekeeper::default();
        let claim = claim();
        let mut raw = assessment(claim.id);
        raw.domain = "  WWW.Britannica.COM ".to_string();

        let result = gatekeeper.screen(raw, &[claim]);
        assert_eq!(result.assessment.domain, "britannica.com");
    }

    #[test]
    fn test_empty_domain_rejected() {
        let gatekeeper = Gatekeeper::default();
        let claim = claim();
        let mut raw = assessment(claim.id);
        raw.domain = "   ".to_string();

        let result = gatekeeper.screen(raw, &[claim]);
        assert_eq!(result.reasons, vec![RejectionReason::EmptyDomain]);
    }

    #[test]
    fn test_reasoning_truncated() {
        let gatekeeper = Gatekeeper::new(ValidationConfig {
            max_reasoning_chars: 5,
            ..Default::default()
        });
        let claim = claim();
        let result = gatekeeper.screen(assessment(claim.id), &[claim]);
        assert_eq!(result.assessment.reasoning, "Encyc");
    }

    #[test]
    fn test_multiple_reasons_collected() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict());
        let mut raw = assessment(ClaimId::new());
        raw.credibility_score = f64::INFINITY;
        raw.recency_score = 2.0;

        let result = gatekeeper.screen(raw, &[claim()]);
        assert_eq!(result.reasons.len(), 3);

        let err = result.into_result().unwrap_err();
        assert!(err.to_string().contains("unknown claim"));
    }
}
