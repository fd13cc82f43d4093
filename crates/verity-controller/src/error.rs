//! Error types for the convergence controller

use thiserror::Error;
use verity_domain::NormalizeError;
use verity_store::StoreError;

/// Errors that abort a verification session
///
/// Collaborator failures and rejected assessments never show up here; they
/// are recorded as round issues and the session carries on.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Invalid configuration or session setup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session was started without claims
    #[error("No claims to verify")]
    NoClaims,

    /// The caller cancelled the session
    #[error("Session cancelled after {rounds_run} completed rounds")]
    Cancelled {
        /// Rounds fully completed before cancellation
        rounds_run: u32,
    },

    /// Store write or read failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Scoring could not produce a confidence
    #[error("Scoring error: {0}")]
    Scoring(#[from] NormalizeError),
}
