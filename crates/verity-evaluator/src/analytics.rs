//! Source analytics table: credibility and bias per outlet

use crate::EvaluatorError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use verity_domain::{normalize_domain, BiasLabel};

/// Credibility rating assigned to unknown domains
pub const DEFAULT_CREDIBILITY: f64 = 0.5;

/// What the table knows about one outlet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceProfile {
    /// Credibility in [0, 1]
    pub credibility_score: f64,
    /// Editorial lean
    pub bias_label: BiasLabel,
}

impl Default for SourceProfile {
    fn default() -> Self {
        Self {
            credibility_score: DEFAULT_CREDIBILITY,
            bias_label: BiasLabel::Center,
        }
    }
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    default: Option<RawProfile>,
    #[serde(default)]
    sources: BTreeMap<String, RawProfile>,
}

#[derive(Deserialize)]
struct RawProfile {
    credibility_score: f64,
    bias_label: String,
}

impl RawProfile {
    fn into_profile(self, name: &str) -> Result<SourceProfile, EvaluatorError> {
        if !(0.0..=1.0).contains(&self.credibility_score) {
            return Err(EvaluatorError::Config(format!(
                "credibility_score for '{}' must be within [0.0, 1.0], got {}",
                name, self.credibility_score
            )));
        }
        let bias_label = BiasLabel::parse(&self.bias_label).ok_or_else(|| {
            EvaluatorError::Config(format!("Unknown bias label '{}' for '{}'", self.bias_label, name))
        })?;
        Ok(SourceProfile {
            credibility_score: self.credibility_score,
            bias_label,
        })
    }
}

/// Deterministic lookup of credibility and bias by domain
///
/// Unknown domains fall back to a neutral profile (credibility 0.5, center).
///
/// # Examples
///
/// ```
/// use verity_evaluator::SourceAnalytics;
/// use verity_domain::BiasLabel;
///
/// let table = SourceAnalytics::from_toml(r#"
///     [sources."reuters.com"]
///     credibility_score = 0.9
///     bias_label = "center"
///
///     [sources."example-blog.net"]
///     credibility_score = 0.3
///     bias_label = "leans right"
/// "#).unwrap();
///
/// assert_eq!(table.lookup("WWW.Reuters.com").credibility_score, 0.9);
/// assert_eq!(table.lookup("example-blog.net").bias_label, BiasLabel::Right);
/// assert_eq!(table.lookup("unknown.org").credibility_score, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceAnalytics {
    profiles: HashMap<String, SourceProfile>,
    fallback: SourceProfile,
}

impl SourceAnalytics {
    /// Empty table; every lookup returns the neutral fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from TOML
    ///
    /// Outlets live under `[sources."<domain>"]`; an optional `[default]`
    /// table overrides the fallback profile.
    pub fn from_toml(toml_str: &str) -> Result<Self, EvaluatorError> {
        let raw: RawTable = toml::from_str(toml_str)?;

        let mut table = Self::new();
        if let Some(fallback) = raw.default {
            table.fallback = fallback.into_profile("default")?;
        }
        for (domain, profile) in raw.sources {
            let profile = profile.into_profile(&domain)?;
            table.insert(&domain, profile);
        }
        Ok(table)
    }

    /// Add or replace an outlet
    pub fn insert(&mut self, domain: &str, profile: SourceProfile) {
        self.profiles.insert(normalize_domain(domain), profile);
    }

    /// Profile for a domain, or the fallback when unknown
    pub fn lookup(&self, domain: &str) -> SourceProfile {
        self.profiles
            .get(&normalize_domain(domain))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Whether the domain has its own entry
    pub fn contains(&self, domain: &str) -> bool {
        self.profiles.contains_key(&normalize_domain(domain))
    }

    /// Number of outlets in the table
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the table has no outlets
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_domain_is_neutral() {
        let table = SourceAnalytics::new();
        let profile = table.lookup("nowhere.example");
        assert_eq!(profile.credibility_score, 0.5);
        assert_eq!(profile.bias_label, BiasLabel::Center);
    }

    #[test]
    fn test_lookup_normalizes_domain() {
        let mut table = SourceAnalytics::new();
        table.insert(
            "www.NASA.gov",
            SourceProfile {
                credibility_score: 0.95,
                bias_label: BiasLabel::Center,
            },
        );

        assert!(table.contains("nasa.gov"));
        assert_eq!(table.lookup(" nasa.GOV ").credibility_score, 0.95);
    }

    #[test]
    fn test_default_override() {
        let table = SourceAnalytics::from_toml(
            r#"
            [default]
            credibility_score = 0.4
            bias_label = "mixed"
            "#,
        )
        .unwrap();

        assert!(table.is_empty());
        assert_eq!(table.lookup("x.com").credibility_score, 0.4);
        assert_eq!(table.lookup("x.com").bias_label, BiasLabel::Mixed);
    }

    #[test]
    fn test_rejects_bad_credibility() {
        let result = SourceAnalytics::from_toml(
            r#"
            [sources."a.com"]
            credibility_score = 1.5
            bias_label = "center"
            "#,
        );
        assert!(matches!(result, Err(EvaluatorError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_label() {
        let result = SourceAnalytics::from_toml(
            r#"
            [sources."a.com"]
            credibility_score = 0.5
            bias_label = "sideways"
            "#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }
}
