//! Source assessments and the signals they carry

use crate::ClaimId;

/// Categorical political/editorial lean of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiasLabel {
    /// Leans left
    Left,

    /// No discernible lean (also used for "neutral" and "n/a")
    Center,

    /// Leans right
    Right,

    /// Lean varies by topic or outlet section
    Mixed,
}

impl BiasLabel {
    /// Get the label name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLabel::Left => "left",
            BiasLabel::Center => "center",
            BiasLabel::Right => "right",
            BiasLabel::Mixed => "mixed",
        }
    }

    /// Parse a label, accepting the rating vocabulary used by bias raters
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "leans left" | "lean left" | "left-center" => Some(BiasLabel::Left),
            "center" | "centre" | "neutral" | "n/a" | "none" => Some(BiasLabel::Center),
            "right" | "leans right" | "lean right" | "right-center" => Some(BiasLabel::Right),
            "mixed" => Some(BiasLabel::Mixed),
            _ => None,
        }
    }
}

impl std::str::FromStr for BiasLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid bias label: {}", s))
    }
}

/// Bias of a source, either categorical or on a continuous [-1, 1] scale
///
/// Negative scores lean left, positive scores lean right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bias {
    /// Categorical rating
    Label(BiasLabel),

    /// Continuous rating in [-1, 1]
    Score(f64),
}

impl Bias {
    /// Whether this bias counts as center for weighting
    ///
    /// A continuous score is center when its magnitude is within `center_band`.
    pub fn is_center(&self, center_band: f64) -> bool {
        match self {
            Bias::Label(label) => *label == BiasLabel::Center,
            Bias::Score(score) => score.abs() <= center_band,
        }
    }
}

impl Default for Bias {
    fn default() -> Self {
        Bias::Label(BiasLabel::Center)
    }
}

impl From<BiasLabel> for Bias {
    fn from(label: BiasLabel) -> Self {
        Bias::Label(label)
    }
}

/// Stance a source takes toward a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    /// Evidence for the claim
    Supports,

    /// Evidence against the claim
    Opposes,

    /// Mentions the topic without taking a side
    Neutral,
}

impl Stance {
    /// Sign applied to a source's weight: +1, -1 or 0
    pub fn sign(&self) -> f64 {
        match self {
            Stance::Supports => 1.0,
            Stance::Opposes => -1.0,
            Stance::Neutral => 0.0,
        }
    }

    /// Get the stance name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Supports => "supports",
            Stance::Opposes => "opposes",
            Stance::Neutral => "neutral",
        }
    }

    /// Parse a stance leniently (oracles rarely agree on the verb form)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "supports" | "support" | "supporting" | "supported" | "agrees" => Some(Stance::Supports),
            "opposes" | "oppose" | "opposing" | "refutes" | "refuted" | "contradicts"
            | "disputes" => Some(Stance::Opposes),
            "neutral" | "unclear" | "none" | "mixed" => Some(Stance::Neutral),
            _ => None,
        }
    }
}

impl std::str::FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid stance: {}", s))
    }
}

/// A candidate source returned by a retriever
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSource {
    /// Domain of the outlet (e.g. "reuters.com")
    pub domain: String,

    /// Article text or snippet
    pub raw_text: String,

    /// Publication date, ISO 8601 if known
    pub published_date: Option<String>,

    /// Full URL, if known
    pub url: Option<String>,
}

impl CandidateSource {
    /// Create a candidate with no date or URL
    pub fn new(domain: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            raw_text: raw_text.into(),
            published_date: None,
            url: None,
        }
    }

    /// Attach a publication date
    pub fn with_published_date(mut self, date: impl Into<String>) -> Self {
        self.published_date = Some(date.into());
        self
    }

    /// Attach a URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Structured judgment of one source toward one claim
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAssessment {
    /// Domain of the assessed source
    pub domain: String,

    /// Claim the judgment refers to
    pub claim_id: ClaimId,

    /// Credibility [0.0, 1.0]
    pub credibility_score: f64,

    /// Editorial lean
    pub bias: Bias,

    /// Recency [0.0, 1.0]
    pub recency_score: f64,

    /// Stance toward the claim
    pub stance: Stance,

    /// One-sentence justification from the oracle
    pub reasoning: String,
}

/// An assessment as committed to a store, tagged with its round
///
/// Records are append-only. A later round's assessment for the same
/// (domain, claim) pair is a new record alongside the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRecord {
    /// Round (0-based) in which the assessment was produced
    pub round: u32,

    /// The assessment itself
    pub assessment: SourceAssessment,
}

impl AssessmentRecord {
    /// Create a record for the given round
    pub fn new(round: u32, assessment: SourceAssessment) -> Self {
        Self { round, assessment }
    }

    /// Uniqueness key within a session ledger
    pub fn key(&self) -> (String, ClaimId, u32) {
        (
            self.assessment.domain.clone(),
            self.assessment.claim_id,
            self.round,
        )
    }
}

/// Derived per-claim score, recomputed every round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimScore {
    /// Scored claim
    pub claim_id: ClaimId,

    /// Signed, unbounded evidence sum
    pub evidence_score: f64,

    /// Per-claim confidence [0.0, 1.0]
    pub confidence_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_label_parse() {
        assert_eq!(BiasLabel::parse("Leans Left"), Some(BiasLabel::Left));
        assert_eq!(BiasLabel::parse("N/A"), Some(BiasLabel::Center));
        assert_eq!(BiasLabel::parse("neutral"), Some(BiasLabel::Center));
        assert_eq!(BiasLabel::parse("RIGHT"), Some(BiasLabel::Right));
        assert_eq!(BiasLabel::parse("mixed"), Some(BiasLabel::Mixed));
        assert!("far-out".parse::<BiasLabel>().is_err());
    }

    #[test]
    fn test_bias_is_center() {
        assert!(Bias::Label(BiasLabel::Center).is_center(0.1));
        assert!(!Bias::Label(BiasLabel::Mixed).is_center(0.1));
        assert!(Bias::Score(0.05).is_center(0.1));
        assert!(Bias::Score(-0.1).is_center(0.1));
        assert!(!Bias::Score(-0.4).is_center(0.1));
        assert!(Bias::Score(0.0).is_center(0.0));
    }

    #[test]
    fn test_stance_sign_and_parse() {
        assert_eq!(Stance::Supports.sign(), 1.0);
        assert_eq!(Stance::Opposes.sign(), -1.0);
        assert_eq!(Stance::Neutral.sign(), 0.0);

        assert_eq!(Stance::parse("Refutes"), Some(Stance::Opposes));
        assert_eq!(Stance::parse(" supporting "), Some(Stance::Supports));
        assert!("maybe".parse::<Stance>().is_err());
    }

    #[test]
    fn test_record_key_carries_claim() {
        let claim_id = ClaimId::from_value(7);
        let record = AssessmentRecord::new(
            2,
            SourceAssessment {
                domain: "bbc.co.uk".to_string(),
                claim_id,
                credibility_score: 0.9,
                bias: Bias::default(),
                recency_score: 1.0,
                stance: Stance::Supports,
                reasoning: String::new(),
            },
        );

        assert_eq!(record.key(), ("bbc.co.uk".to_string(), claim_id, 2));
    }
}
