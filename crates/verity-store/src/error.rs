//! Store error types

use thiserror::Error;
use verity_domain::ClaimId;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record with the same (domain, claim, round) key already exists
    #[error("Duplicate assessment for domain '{domain}', claim {claim_id}, round {round}")]
    Duplicate {
        /// Source domain
        domain: String,
        /// Claim assessed
        claim_id: ClaimId,
        /// Round of the existing record
        round: u32,
    },

    /// Invalid data read back from storage
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether this error rejects a single record rather than signalling a broken store
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}
