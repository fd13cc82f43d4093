//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during gatekeeper operations
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Assessment rejected
    #[error("Assessment rejected: {0}")]
    Rejected(String),
}

impl From<toml::de::Error> for GatekeeperError {
    fn from(err: toml::de::Error) -> Self {
        GatekeeperError::Config(err.to_string())
    }
}
