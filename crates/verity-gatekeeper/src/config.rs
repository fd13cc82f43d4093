//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for validation rules
///
/// Assessments for a claim outside the session are always rejected; no
/// setting turns that off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Clamp out-of-range scores to the nearest bound instead of rejecting
    #[serde(default = "default_true")]
    pub clamp_out_of_range: bool,

    /// Lowercase domains and strip a leading `www.`
    #[serde(default = "default_true")]
    pub normalize_domains: bool,

    /// Longest reasoning kept; longer text is truncated (0 disables)
    #[serde(default = "default_max_reasoning_chars")]
    pub max_reasoning_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_reasoning_chars() -> usize {
    2000
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            clamp_out_of_range: true,
            normalize_domains: true,
            max_reasoning_chars: default_max_reasoning_chars(),
        }
    }
}

impl ValidationConfig {
    /// Clamp whatever can be clamped and keep reasoning untouched
    pub fn permissive() -> Self {
        Self {
            clamp_out_of_range: true,
            normalize_domains: true,
            max_reasoning_chars: 0,
        }
    }

    /// Reject any out-of-range value outright
    pub fn strict() -> Self {
        Self {
            clamp_out_of_range: false,
            normalize_domains: true,
            max_reasoning_chars: 500,
        }
    }

    /// Parse configuration from TOML
    pub fn from_toml(s: &str) -> Result<Self, GatekeeperError> {
        Ok(toml::from_str(s)?)
    }
}
