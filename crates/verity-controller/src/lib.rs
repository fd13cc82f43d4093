//! Verity Controller
//!
//! Drives a verification session: repeated retrieve, evaluate, score rounds
//! over a set of claims until confidence clears the approval threshold or
//! the iteration cap is reached.
//!
//! # Architecture
//!
//! ```text
//! Claims → Retriever → candidates → Evaluator (fan-out) → Gatekeeper → Store
//!                                                                      ↓
//!        Stopped ← decision ← Reviewer (optional) ← Analyst (optional) ← Normalizer ← Aggregator
//! ```
//!
//! # Key Features
//!
//! - **Bounded sessions**: `max_iterations` counts every round; a session
//!   ends `Approved` or `MaxIterationsReached`, nothing else
//! - **Degradation, not abort**: retriever, evaluator and reviewer failures
//!   or timeouts empty their own contribution and are listed in the round report
//! - **Screening**: assessments are clamped or rejected before they reach the store
//! - **Reviewer veto**: feedback reaches the next round's evaluator and analyst verbatim
//! - **Analyst verdicts**: an optional analyst labels each claim and justifies
//!   the label; the reviewer reads it, scores never depend on it
//! - **Cancellation**: callers can stop a session between or during rounds
//!
//! # Example Usage
//!
//! ```
//! use verity_controller::{ControllerConfig, ConvergenceController, Termination};
//! use verity_domain::traits::{EvaluationContext, Evaluator, Retriever};
//! use verity_domain::{Bias, CandidateSource, Claim, SourceAssessment, Stance};
//!
//! struct Wire;
//! impl Retriever for Wire {
//!     type Error = String;
//!     fn find(&self, _claim: &Claim) -> Result<Vec<CandidateSource>, String> {
//!         Ok(vec![CandidateSource::new("apnews.com", "...")])
//!     }
//! }
//!
//! struct Agrees;
//! impl Evaluator for Agrees {
//!     type Error = String;
//!     fn assess(
//!         &self,
//!         candidate: &CandidateSource,
//!         claim: &Claim,
//!         _context: &EvaluationContext,
//!     ) -> Result<SourceAssessment, String> {
//!         Ok(SourceAssessment {
//!             domain: candidate.domain.clone(),
//!             claim_id: claim.id,
//!             credibility_score: 0.9,
//!             bias: Bias::default(),
//!             recency_score: 1.0,
//!             stance: Stance::Supports,
//!             reasoning: "Reports the same figure.".to_string(),
//!         })
//!     }
//! }
//!
//! let controller = ConvergenceController::new(Wire, Agrees, ControllerConfig::default());
//! let claims = [Claim::new("Water boils at 100 C at sea level.")];
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let report = runtime.block_on(controller.check(&claims)).unwrap();
//!
//! // Round 0 scores tanh(0.9); round 1 adds a second record from the same
//! // outlet and clears the threshold.
//! assert_eq!(report.rounds[0].confidence, 0.716);
//! assert_eq!(report.final_confidence, 0.947);
//! assert_eq!(report.termination, Termination::Approved);
//! assert_eq!(report.rounds_run, 2);
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod metrics;
mod report;
mod sink;
mod state;

pub use config::ControllerConfig;
pub use controller::{ConvergenceController, NoAnalysis, NoReview};
pub use error::ControllerError;
pub use metrics::SessionMetrics;
pub use report::{RoundIssue, RoundReport, SessionReport, Stage};
pub use sink::{MemorySink, ReportSink, TracingSink};
pub use state::{ControllerState, Termination};
pub use tokio_util::sync::CancellationToken;
