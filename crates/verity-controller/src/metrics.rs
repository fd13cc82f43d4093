//! Metrics collection for verification sessions

use crate::report::Stage;
use serde::Serialize;
use std::collections::HashMap;

/// Counters collected while a session runs
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionMetrics {
    /// Rounds completed
    pub rounds: usize,

    /// Candidate sources returned by the retriever
    pub candidates_seen: usize,

    /// Candidates dropped because their domain already appeared for the claim this round
    pub duplicates_dropped: usize,

    /// Candidates dropped because they come from the claim's own outlet
    pub excluded_origin_dropped: usize,

    /// Evaluator calls issued
    pub evaluations_attempted: usize,

    /// Assessment records appended to the store
    pub records_committed: usize,

    /// Assessments rejected by screening or the store
    pub assessments_rejected: usize,

    /// Assessments accepted after clamping
    pub assessments_clamped: usize,

    /// Collaborator failures per stage
    pub failures: HashMap<Stage, usize>,

    /// Collaborator calls abandoned on timeout (also counted in `failures`)
    pub timeouts: usize,

    /// Rounds in which the reviewer asked for a revision
    pub review_vetoes: usize,

    /// Wall-clock session time in milliseconds
    pub total_runtime_ms: u64,
}

impl SessionMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed round
    pub fn record_round(&mut self) {
        self.rounds += 1;
    }

    /// Record candidates returned for one claim
    pub fn record_candidates(&mut self, count: usize) {
        self.candidates_seen += count;
    }

    /// Record a candidate dropped as a repeated domain
    pub fn record_duplicate(&mut self) {
        self.duplicates_dropped += 1;
    }

    /// Record a candidate dropped as the claim's origin
    pub fn record_excluded_origin(&mut self) {
        self.excluded_origin_dropped += 1;
    }

    /// Record an evaluator call
    pub fn record_evaluation(&mut self) {
        self.evaluations_attempted += 1;
    }

    /// Record a committed record
    pub fn record_commit(&mut self) {
        self.records_committed += 1;
    }

    /// Record a rejected assessment
    pub fn record_rejection(&mut self) {
        self.assessments_rejected += 1;
    }

    /// Record an assessment accepted with clamped values
    pub fn record_clamp(&mut self) {
        self.assessments_clamped += 1;
    }

    /// Record a collaborator failure
    pub fn record_failure(&mut self, stage: Stage, timed_out: bool) {
        *self.failures.entry(stage).or_insert(0) += 1;
        if timed_out {
            self.timeouts += 1;
        }
    }

    /// Record a reviewer veto
    pub fn record_veto(&mut self) {
        self.review_vetoes += 1;
    }

    /// Failures recorded for one stage
    pub fn failures_at(&self, stage: Stage) -> usize {
        self.failures.get(&stage).copied().unwrap_or(0)
    }

    /// Get total collaborator failures across all stages
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Session Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Rounds: {}", self.rounds),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            format!("Candidates seen: {}", self.candidates_seen),
            format!("  Duplicate domains dropped: {}", self.duplicates_dropped),
            format!("  Origin domains dropped: {}", self.excluded_origin_dropped),
            format!("Evaluations attempted: {}", self.evaluations_attempted),
            format!("Records committed: {}", self.records_committed),
            format!("Assessments rejected: {}", self.assessments_rejected),
            format!("Assessments clamped: {}", self.assessments_clamped),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Collaborator failures by stage:".to_string());
            for stage in [Stage::Retrieval, Stage::Evaluation, Stage::Analysis, Stage::Review] {
                if let Some(count) = self.failures.get(&stage) {
                    lines.push(format!("  {}: {}", stage, count));
                }
            }
            lines.push(format!("  Total: {} ({} timeouts)", self.total_failures(), self.timeouts));
        }

        if self.review_vetoes > 0 {
            lines.push(format!("Review vetoes: {}", self.review_vetoes));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.rounds, 0);
        assert_eq!(metrics.total_failures(), 0);
        assert_eq!(metrics.records_committed, 0);
    }

    #[test]
    fn test_record_failures() {
        let mut metrics = SessionMetrics::new();
        metrics.record_failure(Stage::Evaluation, false);
        metrics.record_failure(Stage::Evaluation, true);
        metrics.record_failure(Stage::Retrieval, true);

        assert_eq!(metrics.failures_at(Stage::Evaluation), 2);
        assert_eq!(metrics.failures_at(Stage::Retrieval), 1);
        assert_eq!(metrics.failures_at(Stage::Review), 0);
        assert_eq!(metrics.total_failures(), 3);
        assert_eq!(metrics.timeouts, 2);
    }

    #[test]
    fn test_record_counters() {
        let mut metrics = SessionMetrics::new();
        metrics.record_round();
        metrics.record_candidates(4);
        metrics.record_duplicate();
        metrics.record_excluded_origin();
        metrics.record_evaluation();
        metrics.record_evaluation();
        metrics.record_commit();
        metrics.record_rejection();
        metrics.record_clamp();
        metrics.record_veto();

        assert_eq!(metrics.rounds, 1);
        assert_eq!(metrics.candidates_seen, 4);
        assert_eq!(metrics.duplicates_dropped, 1);
        assert_eq!(metrics.excluded_origin_dropped, 1);
        assert_eq!(metrics.evaluations_attempted, 2);
        assert_eq!(metrics.records_committed, 1);
        assert_eq!(metrics.assessments_rejected, 1);
        assert_eq!(metrics.assessments_clamped, 1);
        assert_eq!(metrics.review_vetoes, 1);
    }

    #[test]
    fn test_summary() {
        let mut metrics = SessionMetrics::new();
        metrics.record_round();
        metrics.record_round();
        metrics.record_failure(Stage::Review, true);
        metrics.record_veto();
        metrics.total_runtime_ms = 1500;

        let summary = metrics.summary();
        assert!(summary.contains("Rounds: 2"));
        assert!(summary.contains("Total runtime: 1500ms"));
        assert!(summary.contains("review: 1"));
        assert!(summary.contains("Total: 1 (1 timeouts)"));
        assert!(summary.contains("Review vetoes: 1"));
    }

    #[test]
    fn test_serializes_to_json() {
        let mut metrics = SessionMetrics::new();
        metrics.record_failure(Stage::Retrieval, false);

        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["failures"]["retrieval"], 1);
        assert_eq!(value["rounds"], 0);
    }
}
