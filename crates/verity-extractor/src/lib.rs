//! Verity Extractor
//!
//! Turns an article into the atomic, self-contained claims a verification
//! session checks.
//!
//! # Architecture
//!
//! ```text
//! Document → chunking → LLM (per chunk) → parse → dedupe → cap → Claims
//! ```
//!
//! # Key Features
//!
//! - **Claim cap**: at most `max_claims` claims per document (default 5)
//! - **Chunking**: long articles are split by paragraph, section or sentence
//! - **Deduplication**: a claim proposed by two chunks is kept once
//! - **Origin exclusion**: claims remember the outlet they came from so that
//!   outlet cannot corroborate itself
//! - **Partial failure**: a failed chunk is recorded; other chunks still count
//!
//! # Example Usage
//!
//! ```
//! use verity_extractor::{ExtractorConfig, LlmClaimExtractor};
//! use verity_domain::traits::{ClaimExtractor, Document};
//! use verity_llm::MockProvider;
//!
//! let llm = MockProvider::new(r#"{"claims": ["Mars has two moons named Phobos and Deimos."]}"#);
//! let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());
//!
//! let document = Document {
//!     text: "Mars, the red planet, has two moons: Phobos and Deimos.".to_string(),
//!     origin_domain: Some("space-news.example".to_string()),
//! };
//!
//! let claims = extractor.extract(&document).unwrap();
//! assert_eq!(claims.len(), 1);
//! assert!(claims[0].excludes_domain("space-news.example"));
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use config::{ChunkStrategy, ExtractorConfig};
pub use error::ExtractorError;
pub use extractor::LlmClaimExtractor;
pub use types::{ClaimCandidate, ExtractionFailure, ExtractionMetadata, ExtractionResult};
