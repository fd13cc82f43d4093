//! Extraction result types

use verity_domain::Claim;

/// A claim as proposed by the LLM, before it becomes a session claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCandidate {
    /// Self-contained claim text
    pub text: String,
}

impl ClaimCandidate {
    /// Validate the candidate
    pub fn validate(&self, min_chars: usize) -> Result<(), String> {
        let len = self.text.trim().chars().count();
        if len == 0 {
            return Err("Claim text is empty".to_string());
        }
        if len < min_chars {
            return Err(format!("Claim text too short ({} < {} chars)", len, min_chars));
        }
        Ok(())
    }

    /// Key used to detect the same claim proposed by two chunks
    pub fn dedup_key(&self) -> String {
        self.text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end_matches(['.', '!'])
            .to_lowercase()
    }
}

/// Result of extracting claims from one document
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Claims ready for a verification session, in document order
    pub claims: Vec<Claim>,

    /// Chunks whose extraction failed
    pub failures: Vec<ExtractionFailure>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Whether every chunk failed
    pub fn all_failed(&self) -> bool {
        !self.failures.is_empty() && self.failures.len() == self.metadata.chunks_processed
    }
}

/// A chunk that produced no claims because the LLM call or parse failed
#[derive(Debug, Clone)]
pub struct ExtractionFailure {
    /// Index of the chunk in the document
    pub chunk_index: usize,

    /// Reason for failure
    pub reason: String,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetadata {
    /// Outlet the document came from, if known
    pub origin_domain: Option<String>,

    /// Number of chunks sent to the LLM
    pub chunks_processed: usize,

    /// Valid candidates proposed across all chunks
    pub candidates_seen: usize,

    /// Candidates dropped as repeats of an earlier claim
    pub duplicates_dropped: usize,

    /// Candidates dropped by the claim cap
    pub truncated: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str) -> ClaimCandidate {
        ClaimCandidate {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(candidate("The WHO declared a pandemic.").validate(8).is_ok());
        assert!(candidate("   ").validate(0).is_err());
        assert!(candidate("Too short").validate(20).is_err());
    }

    #[test]
    fn test_dedup_key_ignores_case_spacing_and_period() {
        assert_eq!(
            candidate("Mars has  two moons.").dedup_key(),
            candidate("mars has two moons").dedup_key()
        );
    }
}
