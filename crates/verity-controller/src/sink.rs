//! Destinations for finished session reports

use crate::report::SessionReport;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Receives every finished session report
pub trait ReportSink {
    /// Deliver one report
    fn emit(&self, report: &SessionReport);
}

/// Logs reports as structured tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, report: &SessionReport) {
        info!(
            termination = %report.termination,
            confidence = report.final_confidence,
            rounds = report.rounds_run,
            claims = report.claim_scores.len(),
            verdicts = report.verdicts.len(),
            failures = report.metrics.total_failures(),
            "Verification session finished"
        );
        for verdict in &report.verdicts {
            info!(claim_id = %verdict.claim_id, verdict = %verdict.verdict, "{}", verdict.justification);
        }
        for issue in report.issues() {
            warn!(%issue, "Session issue");
        }
        if let Some(note) = &report.note {
            info!("{}", note);
        }
    }
}

/// Keeps reports in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<SessionReport>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far
    pub fn reports(&self) -> Vec<SessionReport> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of reports received
    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether no report arrived yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, report: &SessionReport) {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(report.clone());
    }
}
