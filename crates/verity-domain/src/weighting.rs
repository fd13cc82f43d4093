//! Weighting engine
//!
//! Turns one assessment into a scalar weight and a signed contribution:
//!
//! ```text
//! weight       = recency × credibility × bias_multiplier
//! contribution = stance_sign × weight
//! ```
//!
//! Off-center sources are penalized uniformly; the direction of the lean
//! is not.

use crate::SourceAssessment;

/// Multiplier applied to sources with any lean (default: 0.75)
pub const OFF_CENTER_MULTIPLIER: f64 = 0.75;

/// Magnitude below which a continuous bias score counts as center (default: 0.1)
pub const CENTER_BAND: f64 = 0.1;

/// Tunable parameters of the weighting engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightingPolicy {
    /// Multiplier for sources that are not center
    pub off_center_multiplier: f64,
    /// Center band for continuous bias scores
    pub center_band: f64,
}

impl Default for WeightingPolicy {
    fn default() -> Self {
        Self {
            off_center_multiplier: OFF_CENTER_MULTIPLIER,
            center_band: CENTER_BAND,
        }
    }
}

impl WeightingPolicy {
    /// Bias multiplier for an assessment: 1.0 if center, else the off-center multiplier
    pub fn bias_multiplier(&self, assessment: &SourceAssessment) -> f64 {
        if assessment.bias.is_center(self.center_band) {
            1.0
        } else {
            self.off_center_multiplier
        }
    }

    /// Unsigned weight of an assessment
    ///
    /// Scores are clamped to [0, 1] so an unvalidated record can never
    /// produce a weight outside that range.
    pub fn weight(&self, assessment: &SourceAssessment) -> f64 {
        let recency = assessment.recency_score.clamp(0.0, 1.0);
        let credibility = assessment.credibility_score.clamp(0.0, 1.0);
        recency * credibility * self.bias_multiplier(assessment)
    }

    /// Signed contribution of an assessment to its claim's evidence score
    pub fn contribution(&self, assessment: &SourceAssessment) -> f64 {
        assessment.stance.sign() * self.weight(assessment)
    }
}

/// Weight under the default policy
pub fn weight(assessment: &SourceAssessment) -> f64 {
    WeightingPolicy::default().weight(assessment)
}

/// Contribution under the default policy
pub fn contribution(assessment: &SourceAssessment) -> f64 {
    WeightingPolicy::default().contribution(assessment)
}
