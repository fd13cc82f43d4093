//! Error types for the evaluator adapters

use thiserror::Error;

/// Errors that can occur while judging a source or reviewing a round
#[derive(Error, Debug)]
pub enum EvaluatorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Response parsed as JSON but did not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EvaluatorError {
    fn from(e: serde_json::Error) -> Self {
        EvaluatorError::JsonParse(e.to_string())
    }
}

impl From<toml::de::Error> for EvaluatorError {
    fn from(e: toml::de::Error) -> Self {
        EvaluatorError::Config(e.to_string())
    }
}
