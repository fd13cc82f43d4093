//! Core Extractor implementation

use crate::chunking::TextChunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::{PromptBuilder, CLAIMS_SCHEMA};
use crate::types::{ClaimCandidate, ExtractionFailure, ExtractionMetadata, ExtractionResult};
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use verity_domain::traits::{ClaimExtractor, Document, LlmProvider};
use verity_domain::Claim;

type ChunkOutcome = Result<Vec<ClaimCandidate>, ExtractorError>;

/// Turns an article into at most `max_claims` atomic claims using an LLM
pub struct LlmClaimExtractor<L> {
    llm_provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> LlmClaimExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract claims, calling the LLM on the current thread
    pub fn extract_blocking(&self, document: &Document) -> Result<ExtractionResult, ExtractorError> {
        let started = Instant::now();
        let chunks = self.prepare(document)?;
        let total = chunks.len();

        let outcomes = chunks
            .iter()
            .enumerate()
            .map(|(idx, chunk)| {
                let prompt = self.prompt_for(chunk, idx, total);
                self.generate(&prompt)
                    .and_then(|response| parse_llm_response(&response, self.config.min_claim_chars))
            })
            .collect();

        Ok(self.assemble(document, outcomes, started))
    }

    /// Validate the document and split it into chunks
    fn prepare(&self, document: &Document) -> Result<Vec<String>, ExtractorError> {
        if document.text.trim().is_empty() {
            return Err(ExtractorError::EmptyDocument);
        }

        let length = document.text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }

        info!(
            origin = document.origin_domain.as_deref().unwrap_or("unknown"),
            length, "Starting claim extraction"
        );

        let chunks = TextChunker::new(self.config.chunk_strategy, self.config.max_chunk_size)
            .chunk(&document.text);
        if chunks.len() > 1 {
            info!("Split text into {} chunks", chunks.len());
        }
        Ok(chunks)
    }

    fn prompt_for(&self, chunk: &str, idx: usize, total: usize) -> String {
        let prompt = PromptBuilder::new(chunk, self.config.max_claims)
            .with_part(idx, total)
            .build();
        debug!("Chunk {}/{} prompt length: {} chars", idx + 1, total, prompt.len());
        prompt
    }

    fn generate(&self, prompt: &str) -> Result<String, ExtractorError> {
        self.llm_provider
            .generate_structured(prompt, CLAIMS_SCHEMA)
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    }

    /// Merge per-chunk outcomes into session claims
    fn assemble(&self, document: &Document, outcomes: Vec<ChunkOutcome>, started: Instant) -> ExtractionResult {
        let mut metadata = ExtractionMetadata {
            origin_domain: document.origin_domain.clone(),
            chunks_processed: outcomes.len(),
            ..Default::default()
        };
        let mut failures = Vec::new();
        let mut seen = HashSet::new();
        let mut claims = Vec::new();

        for (chunk_index, outcome) in outcomes.into_iter().enumerate() {
            let candidates = match outcome {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Chunk {} extraction failed: {}", chunk_index, e);
                    failures.push(ExtractionFailure {
                        chunk_index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for candidate in candidates {
                metadata.candidates_seen += 1;

                if !seen.insert(candidate.dedup_key()) {
                    metadata.duplicates_dropped += 1;
                    continue;
                }
                if claims.len() >= self.config.max_claims {
                    metadata.truncated += 1;
                    continue;
                }

                claims.push(self.to_claim(candidate, document));
            }
        }

        metadata.processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            claims = claims.len(),
            duplicates = metadata.duplicates_dropped,
            truncated = metadata.truncated,
            failed_chunks = failures.len(),
            "Extraction complete"
        );

        ExtractionResult {
            claims,
            failures,
            metadata,
        }
    }

    fn to_claim(&self, candidate: ClaimCandidate, document: &Document) -> Claim {
        let claim = Claim::new(candidate.text);
        match (&document.origin_domain, self.config.exclude_origin) {
            (Some(domain), true) => claim.excluding_origin(domain.as_str()),
            _ => claim,
        }
    }
}

impl<L> LlmClaimExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Extract claims from an async context
    ///
    /// Each LLM call runs on the blocking pool and is bounded by
    /// `extraction_timeout_secs`; a timed-out chunk is recorded as a failure.
    pub async fn extract_document(&self, document: &Document) -> Result<ExtractionResult, ExtractorError> {
        let started = Instant::now();
        let chunks = self.prepare(document)?;
        let total = chunks.len();

        let mut outcomes = Vec::with_capacity(total);
        for (idx, chunk) in chunks.iter().enumerate() {
            let prompt = self.prompt_for(chunk, idx, total);

            let outcome = match timeout(self.config.extraction_timeout(), self.call_llm(prompt)).await {
                Ok(Ok(response)) => parse_llm_response(&response, self.config.min_claim_chars),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(ExtractorError::Timeout),
            };
            outcomes.push(outcome);
        }

        Ok(self.assemble(document, outcomes, started))
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate_structured(&prompt, CLAIMS_SCHEMA)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

impl<L> ClaimExtractor for LlmClaimExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = ExtractorError;

    fn extract(&self, document: &Document) -> Result<Vec<Claim>, Self::Error> {
        let result = self.extract_blocking(document)?;

        if result.all_failed() {
            let first = result
                .failures
                .first()
                .map(|f| f.reason.clone())
                .unwrap_or_default();
            return Err(ExtractorError::AllChunksFailed {
                chunks: result.metadata.chunks_processed,
                first,
            });
        }

        Ok(result.claims)
    }
}
