//! Configuration for verification sessions
//!
//! Defines the approval threshold, the iteration cap, per-collaborator
//! timeouts and the fan-out width of a round.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use verity_domain::normalization::DECISIVE_THRESHOLD;
use verity_domain::weighting::{CENTER_BAND, OFF_CENTER_MULTIPLIER};
use verity_domain::WeightingPolicy;
use verity_gatekeeper::ValidationConfig;

/// Configuration for the convergence controller
///
/// # Examples
///
/// ```
/// use verity_controller::ControllerConfig;
///
/// let config = ControllerConfig::default();
/// assert_eq!(config.approval_threshold, 0.90);
/// assert_eq!(config.max_iterations, 3);
///
/// // More rounds, longer timeouts
/// let config = ControllerConfig::thorough();
/// assert_eq!(config.max_iterations, 5);
///
/// // A single round
/// let config = ControllerConfig::quick();
/// assert_eq!(config.max_iterations, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Confidence a session must reach to be approved, on the 0..1 scale
    pub approval_threshold: f64,

    /// Most rounds a session may run, counting the first
    pub max_iterations: u32,

    /// Evidence magnitude a claim needs to count towards confidence
    #[serde(default = "default_decisive_threshold")]
    pub decisive_threshold: f64,

    /// Weight multiplier applied to off-center sources
    #[serde(default = "default_off_center_multiplier")]
    pub off_center_multiplier: f64,

    /// Largest |bias score| still treated as center
    #[serde(default = "default_center_band")]
    pub center_band: f64,

    /// Timeout for one retriever call (seconds)
    pub retrieval_timeout_secs: u64,

    /// Timeout for one evaluator call (seconds)
    pub evaluation_timeout_secs: u64,

    /// Timeout for one analyst call (seconds)
    #[serde(default = "default_analysis_timeout_secs")]
    pub analysis_timeout_secs: u64,

    /// Timeout for one reviewer call (seconds)
    pub review_timeout_secs: u64,

    /// Blocking collaborator calls in flight at once, across rounds
    ///
    /// A call abandoned on timeout keeps its slot until its thread returns.
    pub max_concurrent_evaluations: usize,

    /// Screening rules for incoming assessments
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_analysis_timeout_secs() -> u64 {
    60
}

fn default_decisive_threshold() -> f64 {
    DECISIVE_THRESHOLD
}

fn default_off_center_multiplier() -> f64 {
    OFF_CENTER_MULTIPLIER
}

fn default_center_band() -> f64 {
    CENTER_BAND
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            approval_threshold: 0.90,
            max_iterations: 3,
            decisive_threshold: DECISIVE_THRESHOLD,
            off_center_multiplier: OFF_CENTER_MULTIPLIER,
            center_band: CENTER_BAND,
            retrieval_timeout_secs: 30,
            evaluation_timeout_secs: 60,
            analysis_timeout_secs: default_analysis_timeout_secs(),
            review_timeout_secs: 60,
            max_concurrent_evaluations: 8,
            validation: ValidationConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// More rounds and patient timeouts for slow local models
    pub fn thorough() -> Self {
        Self {
            max_iterations: 5,
            retrieval_timeout_secs: 60,
            evaluation_timeout_secs: 180,
            analysis_timeout_secs: 180,
            review_timeout_secs: 180,
            max_concurrent_evaluations: 4,
            ..Default::default()
        }
    }

    /// One round with tight timeouts
    pub fn quick() -> Self {
        Self {
            max_iterations: 1,
            retrieval_timeout_secs: 10,
            evaluation_timeout_secs: 20,
            analysis_timeout_secs: 20,
            review_timeout_secs: 20,
            max_concurrent_evaluations: 16,
            validation: ValidationConfig::permissive(),
            ..Default::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.approval_threshold > 0.0 && self.approval_threshold <= 1.0) {
            return Err(format!(
                "approval_threshold must be in (0, 1], got {}",
                self.approval_threshold
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if !(self.decisive_threshold.is_finite() && self.decisive_threshold >= 0.0) {
            return Err(format!(
                "decisive_threshold must be a non-negative number, got {}",
                self.decisive_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.off_center_multiplier) {
            return Err(format!(
                "off_center_multiplier must be in [0, 1], got {}",
                self.off_center_multiplier
            ));
        }
        if !(0.0..=1.0).contains(&self.center_band) {
            return Err(format!("center_band must be in [0, 1], got {}", self.center_band));
        }
        if self.retrieval_timeout_secs == 0
            || self.evaluation_timeout_secs == 0
            || self.analysis_timeout_secs == 0
            || self.review_timeout_secs == 0
        {
            return Err("timeouts must be greater than 0".to_string());
        }
        if self.max_concurrent_evaluations == 0 {
            return Err("max_concurrent_evaluations must be at least 1".to_string());
        }
        Ok(())
    }

    /// Weighting policy derived from the multiplier and center band
    pub fn weighting_policy(&self) -> WeightingPolicy {
        WeightingPolicy {
            off_center_multiplier: self.off_center_multiplier,
            center_band: self.center_band,
        }
    }

    /// Retriever timeout as Duration
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_secs(self.retrieval_timeout_secs)
    }

    /// Evaluator timeout as Duration
    pub fn evaluation_timeout(&self) -> Duration {
        Duration::from_secs(self.evaluation_timeout_secs)
    }

    /// Analyst timeout as Duration
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    /// Reviewer timeout as Duration
    pub fn review_timeout(&self) -> Duration {
        Duration::from_secs(self.review_timeout_secs)
    }
}
