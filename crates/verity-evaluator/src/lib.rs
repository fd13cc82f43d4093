//! Verity Evaluator
//!
//! Language-model adapters for the judgment seams of a verification
//! session: stance toward a claim ([`LlmEvaluator`]), a narrated verdict
//! per claim ([`LlmAnalyst`]) and approval of a scored round ([`LlmReviewer`]).
//!
//! # Architecture
//!
//! ```text
//! CandidateSource ─┬─ SourceAnalytics ──→ credibility, bias
//!                  ├─ RecencyScorer ────→ recency
//!                  └─ LLM ──────────────→ stance, reasoning
//!                                          ↓
//!                                   SourceAssessment
//! ```
//!
//! Only stance and reasoning come from the model. Everything numeric is
//! table- or clock-driven, so two runs over the same sources differ at
//! most in stance.
//!
//! # Example Usage
//!
//! ```
//! use verity_evaluator::{LlmEvaluator, SourceAnalytics};
//! use verity_domain::traits::{EvaluationContext, Evaluator};
//! use verity_domain::{CandidateSource, Claim, Stance};
//! use verity_llm::MockProvider;
//!
//! let llm = MockProvider::new(r#"{"stance": "supports", "reasoning": "Lists both moons."}"#);
//! let evaluator = LlmEvaluator::new(llm, SourceAnalytics::new());
//!
//! let claim = Claim::new("Mars has two moons.");
//! let source = CandidateSource::new("nasa.gov", "Phobos and Deimos orbit Mars.");
//!
//! let assessment = evaluator
//!     .assess(&source, &claim, &EvaluationContext::default())
//!     .unwrap();
//! assert_eq!(assessment.stance, Stance::Supports);
//! assert_eq!(assessment.credibility_score, 0.5);
//! ```

#![warn(missing_docs)]

mod analyst;
mod analytics;
mod config;
mod error;
mod evaluator;
mod parser;
mod prompt;
mod recency;
mod reviewer;

#[cfg(test)]
mod tests;

pub use analyst::LlmAnalyst;
pub use analytics::{SourceAnalytics, SourceProfile, DEFAULT_CREDIBILITY};
pub use config::{EvaluatorConfig, RecencyBands};
pub use error::EvaluatorError;
pub use evaluator::LlmEvaluator;
pub use parser::{
    parse_analysis_response, parse_review_response, parse_stance_response, StanceJudgment,
};
pub use prompt::{ANALYSIS_SCHEMA, REVIEW_SCHEMA, STANCE_SCHEMA};
pub use recency::{parse_date, RecencyScorer};
pub use reviewer::LlmReviewer;
