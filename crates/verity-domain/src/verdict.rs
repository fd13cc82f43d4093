//! Analyst verdicts
//!
//! A verdict is the narrative counterpart of a claim score: a category and
//! a justification written for a human reader. Verdicts never feed back
//! into weighting or normalization.

use crate::ClaimId;
use std::fmt;

/// Categorical judgment of a claim's factuality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Entirely supported by several credible sources
    Accurate,

    /// Core is true, but details or context are missing
    MostlyAccurate,

    /// Significant elements of both truth and falsehood
    Mixed,

    /// Technically true but framed to create a false impression
    Misleading,

    /// Refuted by credible sources
    Inaccurate,

    /// Not enough credible evidence either way
    Unverifiable,
}

impl Verdict {
    /// Every verdict, from most to least favourable
    pub const ALL: [Verdict; 6] = [
        Verdict::Accurate,
        Verdict::MostlyAccurate,
        Verdict::Mixed,
        Verdict::Misleading,
        Verdict::Inaccurate,
        Verdict::Unverifiable,
    ];

    /// Get the verdict name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Accurate => "Accurate",
            Verdict::MostlyAccurate => "Mostly Accurate",
            Verdict::Mixed => "Mixed",
            Verdict::Misleading => "Misleading",
            Verdict::Inaccurate => "Inaccurate",
            Verdict::Unverifiable => "Unverifiable",
        }
    }

    /// Parse a verdict, ignoring case and `_`/`-` separators
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "accurate" | "true" => Some(Verdict::Accurate),
            "mostly accurate" | "mostly true" => Some(Verdict::MostlyAccurate),
            "mixed" => Some(Verdict::Mixed),
            "misleading" => Some(Verdict::Misleading),
            "inaccurate" | "false" => Some(Verdict::Inaccurate),
            "unverifiable" | "unverified" => Some(Verdict::Unverifiable),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid verdict: {}", s))
    }
}

/// The analyst's finding for one claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimVerdict {
    /// Claim the finding is about
    pub claim_id: ClaimId,

    /// Category
    pub verdict: Verdict,

    /// Narrative citing the strongest evidence
    pub justification: String,
}
