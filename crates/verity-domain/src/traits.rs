//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the convergence core and its
//! collaborators. Implementations live in other crates; the core only sees
//! the structured data crossing these seams.
//!
//! Collaborators are synchronous. Callers that need timeouts or fan-out run
//! them on a blocking pool.

use crate::{
    AssessmentRecord, CandidateSource, Claim, ClaimId, ClaimScore, ClaimVerdict, SourceAssessment,
};

/// Append-only ledger of assessment records for one session
///
/// Implemented by the infrastructure layer (verity-store). Records are never
/// mutated; the only destructive operation is an explicit [`reset`](Self::reset)
/// between top-level invocations.
pub trait AssessmentStore {
    /// Error type for store operations
    type Error;

    /// Append a record
    ///
    /// Implementations must reject a second record with the same
    /// (domain, claim, round) key.
    fn append(&mut self, record: AssessmentRecord) -> Result<(), Self::Error>;

    /// Records matching the query, in insertion order
    fn query(&self, query: &AssessmentQuery) -> Result<Vec<AssessmentRecord>, Self::Error>;

    /// Number of records held
    fn len(&self) -> Result<usize, Self::Error>;

    /// Whether the store holds no records
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.len()? == 0)
    }

    /// Drop every record
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// All records for one claim, across every round
    fn records_for_claim(&self, claim_id: ClaimId) -> Result<Vec<AssessmentRecord>, Self::Error> {
        self.query(&AssessmentQuery::for_claim(claim_id))
    }
}

/// Query criteria for reading records back
///
/// Domain lookups always carry the claim key when one is given; a
/// domain-only query returns that domain's records for every claim.
#[derive(Debug, Clone, Default)]
pub struct AssessmentQuery {
    /// Filter by claim
    pub claim_id: Option<ClaimId>,

    /// Filter by source domain (exact match)
    pub domain: Option<String>,

    /// Filter by round
    pub round: Option<u32>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl AssessmentQuery {
    /// Query every record of one claim
    pub fn for_claim(claim_id: ClaimId) -> Self {
        Self {
            claim_id: Some(claim_id),
            ..Default::default()
        }
    }

    /// Whether a record satisfies the filters (limit excluded)
    pub fn matches(&self, record: &AssessmentRecord) -> bool {
        self.claim_id.map_or(true, |id| record.assessment.claim_id == id)
            && self
                .domain
                .as_ref()
                .map_or(true, |d| &record.assessment.domain == d)
            && self.round.map_or(true, |r| record.round == r)
    }
}

/// Finds candidate sources for a claim (web search, archives, fixtures)
pub trait Retriever {
    /// Error type for retrieval
    type Error;

    /// Zero or more candidate sources for the claim
    fn find(&self, claim: &Claim) -> Result<Vec<CandidateSource>, Self::Error>;
}

/// Per-round context handed to the evaluator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Round (0-based) the evaluation belongs to
    pub round: u32,

    /// Reviewer feedback from the previous round, verbatim
    pub feedback: Option<String>,
}

/// Judges one candidate source against one claim
///
/// The oracle behind this trait may be a language model or a human panel;
/// the core depends only on the structured output.
pub trait Evaluator {
    /// Error type for evaluation
    type Error;

    /// Produce a structured assessment of `candidate` toward `claim`
    fn assess(
        &self,
        candidate: &CandidateSource,
        claim: &Claim,
        context: &EvaluationContext,
    ) -> Result<SourceAssessment, Self::Error>;
}

/// What the analyst sees once a round is scored
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Round just scored
    pub round: u32,

    /// Claims under verification
    pub claims: Vec<Claim>,

    /// Scores computed for this round
    pub claim_scores: Vec<ClaimScore>,

    /// Every assessment in the ledger so far
    pub assessments: Vec<SourceAssessment>,

    /// Reviewer feedback from the previous round, verbatim
    pub feedback: Option<String>,
}

/// Writes a verdict and justification for each claim
///
/// The analyst explains the evidence; it never changes a score. Its
/// findings are what the reviewer reads alongside the numbers.
pub trait Analyst {
    /// Error type for analysis
    type Error;

    /// Findings for the claims in `request`, at most one per claim
    fn analyze(&self, request: &AnalysisRequest) -> Result<Vec<ClaimVerdict>, Self::Error>;
}

/// What a reviewer sees at the end of a round
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    /// Round just scored
    pub round: u32,

    /// Claims under verification
    pub claims: Vec<Claim>,

    /// Scores computed for this round
    pub claim_scores: Vec<ClaimScore>,

    /// Session-level confidence for this round
    pub confidence: f64,

    /// Every assessment in the ledger so far
    pub assessments: Vec<SourceAssessment>,

    /// Analyst findings for this round; empty without an analyst
    pub verdicts: Vec<ClaimVerdict>,
}

/// Outcome of a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// The round's result is acceptable
    Approved,

    /// Another round is needed; feedback goes to the next round's evaluator
    RevisionNeeded {
        /// Specific, actionable instructions
        feedback: String,
    },
}

/// Adjudicates a round's result
pub trait Reviewer {
    /// Error type for review
    type Error;

    /// Review the scored round
    fn review(&self, request: &ReviewRequest) -> Result<ReviewDecision, Self::Error>;
}

/// A document handed to claim extraction
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Full text
    pub text: String,

    /// Domain the document was published on, if known
    pub origin_domain: Option<String>,
}

/// Trait for extracting claims from documents
///
/// Implemented by the application layer (verity-extractor)
pub trait ClaimExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract atomic claims from a document
    fn extract(&self, document: &Document) -> Result<Vec<Claim>, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (verity-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured (JSON) output, if the backend supports it
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
