//! Configuration for the evaluator adapters

use serde::{Deserialize, Serialize};

/// Age bands used to turn a publication date into a recency score
///
/// A source at most `fresh_days` old scores `fresh_score`, then
/// `recent_*`, then `aging_*`; anything older scores `stale_score`.
/// A missing or unparseable date scores `undated_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyBands {
    /// Upper bound (days) of the freshest band
    pub fresh_days: i64,
    /// Score for the freshest band
    pub fresh_score: f64,
    /// Upper bound (days) of the recent band
    pub recent_days: i64,
    /// Score for the recent band
    pub recent_score: f64,
    /// Upper bound (days) of the aging band
    pub aging_days: i64,
    /// Score for the aging band
    pub aging_score: f64,
    /// Score for anything older
    pub stale_score: f64,
    /// Score when the date is missing or unreadable
    pub undated_score: f64,
}

impl Default for RecencyBands {
    fn default() -> Self {
        Self {
            fresh_days: 7,
            fresh_score: 1.0,
            recent_days: 30,
            recent_score: 0.8,
            aging_days: 180,
            aging_score: 0.5,
            stale_score: 0.2,
            undated_score: 0.0,
        }
    }
}

impl RecencyBands {
    /// Validate band ordering and score ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.fresh_days < 0 {
            return Err("fresh_days must be non-negative".to_string());
        }
        if !(self.fresh_days < self.recent_days && self.recent_days < self.aging_days) {
            return Err("recency bands must satisfy fresh_days < recent_days < aging_days".to_string());
        }
        let scores = [
            ("fresh_score", self.fresh_score),
            ("recent_score", self.recent_score),
            ("aging_score", self.aging_score),
            ("stale_score", self.stale_score),
            ("undated_score", self.undated_score),
        ];
        for (name, score) in scores {
            if !(0.0..=1.0).contains(&score) {
                return Err(format!("{} must be within [0.0, 1.0], got {}", name, score));
            }
        }
        Ok(())
    }
}

/// Configuration for `LlmEvaluator`, `LlmAnalyst` and `LlmReviewer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Longest slice of source text placed in a prompt (characters)
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,

    /// Request JSON-mode output from the provider
    #[serde(default = "default_structured_output")]
    pub structured_output: bool,

    /// Most assessments listed in an analysis or review prompt
    #[serde(default = "default_review_assessment_limit")]
    pub review_assessment_limit: usize,

    /// Recency bands
    #[serde(default)]
    pub recency: RecencyBands,
}

fn default_max_source_chars() -> usize {
    6_000
}

fn default_structured_output() -> bool {
    true
}

fn default_review_assessment_limit() -> usize {
    30
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_source_chars: default_max_source_chars(),
            structured_output: default_structured_output(),
            review_assessment_limit: default_review_assessment_limit(),
            recency: RecencyBands::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_source_chars == 0 {
            return Err("max_source_chars must be greater than 0".to_string());
        }
        if self.review_assessment_limit == 0 {
            return Err("review_assessment_limit must be greater than 0".to_string());
        }
        self.recency.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
