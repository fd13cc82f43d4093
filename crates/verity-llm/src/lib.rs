//! Verity LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `verity-domain`, used by
//! the evaluator, reviewer and claim extractor adapters.
//!
//! # Providers
//!
//! - `MockProvider`: scripted, deterministic responses for tests
//! - `OllamaProvider`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use verity_llm::MockProvider;
//! use verity_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"stance": "supports"}"#);
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, r#"{"stance": "supports"}"#);
//! ```

#![warn(missing_docs)]

mod mock;
pub mod ollama;

use thiserror::Error;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(LlmError::Communication("reset".into()).is_transient());
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(!LlmError::ModelNotAvailable("x".into()).is_transient());
        assert!(!LlmError::InvalidResponse("x".into()).is_transient());
    }
}
