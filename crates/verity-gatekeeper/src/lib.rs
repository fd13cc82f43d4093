//! Verity Gatekeeper
//!
//! Screens assessments coming back from an evaluator before they reach the
//! ledger.
//!
//! The Gatekeeper provides:
//! - Unknown-claim rejection (every assessment must reference a claim in the session)
//! - Range checks for credibility, recency and continuous bias scores
//! - Clamp-or-reject policy for out-of-range values
//! - Domain normalization so duplicate detection sees one spelling per outlet
//!
//! # Examples
//!
//! ```
//! use verity_gatekeeper::{Gatekeeper, ValidationConfig, ValidationStatus};
//! use verity_domain::{Bias, Claim, SourceAssessment, Stance};
//!
//! let claim = Claim::new("Water boils at 100 °C at sea level.");
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//!
//! let raw = SourceAssessment {
//!     domain: "WWW.Example.org".to_string(),
//!     claim_id: claim.id,
//!     credibility_score: 1.4,
//!     bias: Bias::default(),
//!     recency_score: 0.8,
//!     stance: Stance::Supports,
//!     reasoning: String::new(),
//! };
//!
//! let result = gatekeeper.screen(raw, &[claim]);
//! assert_eq!(result.status, ValidationStatus::Accepted);
//! assert_eq!(result.assessment.credibility_score, 1.0);
//! assert_eq!(result.assessment.domain, "example.org");
//! assert_eq!(result.adjustments.len(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{Adjustment, Field, Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
