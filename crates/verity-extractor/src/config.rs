//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text chunking strategy for long articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChunkStrategy {
    /// Split by paragraphs (blank lines)
    #[default]
    ByParagraph,
    /// Split by sections (markdown headers or numbered headings)
    BySection,
    /// Split by sentences, packed up to the chunk size
    BySentence,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Most claims returned per document
    pub max_claims: usize,

    /// Maximum time for a single LLM call (seconds)
    pub extraction_timeout_secs: u64,

    /// Text chunking strategy for long documents
    pub chunk_strategy: ChunkStrategy,

    /// Maximum chunk size (characters)
    pub max_chunk_size: usize,

    /// Shortest claim text kept (characters)
    #[serde(default = "default_min_claim_chars")]
    pub min_claim_chars: usize,

    /// Mark claims so the document's own outlet cannot corroborate them
    #[serde(default = "default_exclude_origin")]
    pub exclude_origin: bool,
}

fn default_min_claim_chars() -> usize {
    8
}

fn default_exclude_origin() -> bool {
    true
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.max_claims == 0 {
            return Err("max_claims must be greater than 0".to_string());
        }
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }
        if self.max_chunk_size > self.max_text_length {
            return Err("max_chunk_size cannot exceed max_text_length".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_text_length: 50_000,
            max_claims: 5,
            extraction_timeout_secs: 120,
            chunk_strategy: ChunkStrategy::ByParagraph,
            max_chunk_size: 10_000,
            min_claim_chars: default_min_claim_chars(),
            exclude_origin: default_exclude_origin(),
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: shorter timeouts, smaller chunks, fewer claims
    pub fn aggressive() -> Self {
        Self {
            max_text_length: 20_000,
            max_claims: 3,
            extraction_timeout_secs: 60,
            chunk_strategy: ChunkStrategy::ByParagraph,
            max_chunk_size: 5_000,
            min_claim_chars: 12,
            exclude_origin: true,
        }
    }

    /// Lenient preset: longer timeouts, larger chunks, more claims
    pub fn lenient() -> Self {
        Self {
            max_text_length: 100_000,
            max_claims: 10,
            extraction_timeout_secs: 300,
            chunk_strategy: ChunkStrategy::BySection,
            max_chunk_size: 20_000,
            min_claim_chars: 4,
            exclude_origin: true,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
