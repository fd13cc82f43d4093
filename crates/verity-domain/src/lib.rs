//! Verity Domain Layer
//!
//! Core data model and the deterministic evidence-weighting engine for
//! claim verification. Like any domain layer it stays free of
//! infrastructure: the only external dependency is `uuid`.
//!
//! ## Key Concepts
//!
//! - **Claim**: an atomic factual assertion to verify
//! - **SourceAssessment**: one source's credibility, recency, bias and stance toward a claim
//! - **Evidence score**: signed, unbounded sum of weighted stance contributions
//! - **Confidence**: evidence saturated into [0, 1] with `tanh`
//! - **Verdict**: an analyst's categorical, narrated finding on a claim; never scored
//!
//! ## Pipeline
//!
//! ```text
//! assessment → weighting → aggregation (per claim) → normalization → confidence
//! ```
//!
//! # Examples
//!
//! ```
//! use verity_domain::{aggregation, normalization, Bias, BiasLabel, Claim, SourceAssessment, Stance};
//! use std::collections::BTreeMap;
//!
//! let claim = Claim::new("Mars has two moons named Phobos and Deimos.");
//! let assessment = SourceAssessment {
//!     domain: "nasa.gov".to_string(),
//!     claim_id: claim.id,
//!     credibility_score: 0.9,
//!     bias: Bias::Label(BiasLabel::Center),
//!     recency_score: 1.0,
//!     stance: Stance::Supports,
//!     reasoning: "NASA fact sheet lists both moons.".to_string(),
//! };
//!
//! let evidence = aggregation::aggregate(claim.id, [&assessment]);
//! let scores = BTreeMap::from([(claim.id, evidence)]);
//! let confidence = normalization::normalize(&scores, normalization::DECISIVE_THRESHOLD).unwrap();
//! assert_eq!(confidence, 0.716);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregation;
pub mod assessment;
pub mod claim;
pub mod normalization;
pub mod traits;
pub mod verdict;
pub mod weighting;

// Re-exports for convenience
pub use assessment::{
    AssessmentRecord, Bias, BiasLabel, CandidateSource, ClaimScore, SourceAssessment, Stance,
};
pub use claim::{normalize_domain, Claim, ClaimId};
pub use normalization::NormalizeError;
pub use verdict::{ClaimVerdict, Verdict};
pub use weighting::WeightingPolicy;
