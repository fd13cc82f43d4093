//! Round and session reports

use crate::metrics::SessionMetrics;
use crate::state::{ControllerState, Termination};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use verity_domain::traits::ReviewDecision;
use verity_domain::{ClaimId, ClaimScore, ClaimVerdict};

/// Collaborator stage a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Retriever call
    Retrieval,
    /// Evaluator call
    Evaluation,
    /// Analyst call
    Analysis,
    /// Reviewer call
    Review,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Retrieval => f.write_str("retrieval"),
            Stage::Evaluation => f.write_str("evaluation"),
            Stage::Analysis => f.write_str("analysis"),
            Stage::Review => f.write_str("review"),
        }
    }
}

/// Something that went wrong in a round without stopping the session
#[derive(Debug, Clone, PartialEq)]
pub enum RoundIssue {
    /// An assessment broke a data contract and was rejected or clamped
    ContractViolation {
        /// Domain of the offending assessment
        domain: String,
        /// Claim it referred to
        claim_id: ClaimId,
        /// What was wrong
        reason: String,
        /// False when the record was kept after clamping
        rejected: bool,
    },

    /// A collaborator errored or timed out; its contribution is empty
    CollaboratorFailure {
        /// Failing stage
        stage: Stage,
        /// Claim being processed, if any
        claim_id: Option<ClaimId>,
        /// Source domain, for evaluation failures
        domain: Option<String>,
        /// Error text
        message: String,
        /// Whether the call was abandoned on timeout
        timed_out: bool,
    },
}

impl RoundIssue {
    /// Whether this issue is a collaborator failure at `stage`
    pub fn is_failure_at(&self, stage: Stage) -> bool {
        matches!(self, RoundIssue::CollaboratorFailure { stage: s, .. } if *s == stage)
    }

    /// Whether the offending record was discarded
    pub fn is_rejection(&self) -> bool {
        matches!(self, RoundIssue::ContractViolation { rejected: true, .. })
    }
}

impl fmt::Display for RoundIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundIssue::ContractViolation {
                domain,
                claim_id,
                reason,
                rejected,
            } => {
                let action = if *rejected { "rejected" } else { "clamped" };
                write!(f, "{} assessment from {} for claim {}: {}", action, domain, claim_id, reason)
            }
            RoundIssue::CollaboratorFailure {
                stage,
                domain,
                message,
                timed_out,
                ..
            } => {
                let kind = if *timed_out { "timed out" } else { "failed" };
                match domain {
                    Some(domain) => write!(f, "{} {} for {}: {}", stage, kind, domain, message),
                    None => write!(f, "{} {}: {}", stage, kind, message),
                }
            }
        }
    }
}

/// What happened in one round
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// Round index, starting at 0
    pub round: u32,

    /// States entered during the round, in order
    pub transitions: Vec<ControllerState>,

    /// Reviewer feedback the evaluator saw this round
    pub feedback: Option<String>,

    /// Candidates returned by the retriever across all claims
    pub candidates_found: usize,

    /// Candidates sent to the evaluator after dropping repeats and origins
    pub candidates_evaluated: usize,

    /// Records appended to the store this round
    pub records_committed: usize,

    /// Per-claim scores over every record stored so far
    pub claim_scores: Vec<ClaimScore>,

    /// Session confidence after this round
    pub confidence: f64,

    /// Analyst findings, in claim order; empty without an analyst
    pub verdicts: Vec<ClaimVerdict>,

    /// Reviewer verdict, when a reviewer answered
    pub review: Option<ReviewDecision>,

    /// Problems that did not stop the round
    pub issues: Vec<RoundIssue>,
}

impl RoundReport {
    pub(crate) fn new(round: u32, feedback: Option<String>) -> Self {
        Self {
            round,
            transitions: Vec::new(),
            feedback,
            candidates_found: 0,
            candidates_evaluated: 0,
            records_committed: 0,
            claim_scores: Vec::new(),
            confidence: 0.0,
            verdicts: Vec::new(),
            review: None,
            issues: Vec::new(),
        }
    }

    /// Feedback the reviewer returned, if it asked for a revision
    pub fn revision_feedback(&self) -> Option<&str> {
        match &self.review {
            Some(ReviewDecision::RevisionNeeded { feedback }) => Some(feedback),
            _ => None,
        }
    }
}

/// Final outcome of a verification session
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Confidence after the last round
    pub final_confidence: f64,

    /// Per-claim scores after the last round
    pub claim_scores: Vec<ClaimScore>,

    /// Analyst findings from the last round
    pub verdicts: Vec<ClaimVerdict>,

    /// Why the session stopped
    pub termination: Termination,

    /// Rounds executed
    pub rounds_run: u32,

    /// Per-round detail
    pub rounds: Vec<RoundReport>,

    /// Session counters
    pub metrics: SessionMetrics,

    /// Human-readable remark, set when the threshold was not cleared
    pub note: Option<String>,
}

impl SessionReport {
    /// Whether the session was approved
    pub fn is_approved(&self) -> bool {
        self.termination == Termination::Approved
    }

    /// Score for one claim
    pub fn score_for(&self, claim_id: ClaimId) -> Option<&ClaimScore> {
        self.claim_scores.iter().find(|s| s.claim_id == claim_id)
    }

    /// Analyst finding for one claim
    pub fn verdict_for(&self, claim_id: ClaimId) -> Option<&ClaimVerdict> {
        self.verdicts.iter().find(|v| v.claim_id == claim_id)
    }

    /// Every issue across all rounds
    pub fn issues(&self) -> impl Iterator<Item = &RoundIssue> {
        self.rounds.iter().flat_map(|r| r.issues.iter())
    }

    /// Structured form for logs and transports
    pub fn to_json(&self) -> Value {
        let claim_scores: Vec<Value> = self
            .claim_scores
            .iter()
            .map(|s| {
                json!({
                    "claim_id": s.claim_id.to_string(),
                    "evidence_score": s.evidence_score,
                    "confidence_score": s.confidence_score,
                })
            })
            .collect();

        let verdicts: Vec<Value> = self
            .verdicts
            .iter()
            .map(|v| {
                json!({
                    "claim_id": v.claim_id.to_string(),
                    "verdict": v.verdict.as_str(),
                    "justification": v.justification,
                })
            })
            .collect();

        let rounds: Vec<Value> = self
            .rounds
            .iter()
            .map(|r| {
                json!({
                    "round": r.round,
                    "confidence": r.confidence,
                    "candidates_found": r.candidates_found,
                    "records_committed": r.records_committed,
                    "feedback": r.feedback,
                    "issues": r.issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "final_confidence": self.final_confidence,
            "termination": self.termination.to_string(),
            "rounds_run": self.rounds_run,
            "claim_scores": claim_scores,
            "verdicts": verdicts,
            "rounds": rounds,
            "metrics": serde_json::to_value(&self.metrics).unwrap_or(Value::Null),
            "note": self.note,
        })
    }
}
