//! Convergence controller implementation

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::metrics::SessionMetrics;
use crate::report::{RoundIssue, RoundReport, SessionReport, Stage};
use crate::sink::ReportSink;
use crate::state::{ControllerState, Termination};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use verity_domain::aggregation::aggregate_all;
use verity_domain::normalization::{claim_scores, normalize};
use verity_domain::traits::{
    AnalysisRequest, Analyst, AssessmentQuery, AssessmentStore, EvaluationContext, Evaluator,
    Retriever, ReviewDecision, ReviewRequest, Reviewer,
};
use verity_domain::{
    normalize_domain, AssessmentRecord, CandidateSource, Claim, ClaimId, ClaimScore, ClaimVerdict,
    SourceAssessment,
};
use verity_gatekeeper::Gatekeeper;
use verity_store::{MemoryStore, StoreError};

/// Reviewer slot for controllers built without one
#[derive(Debug, Clone, Copy)]
pub enum NoReview {}

impl Reviewer for NoReview {
    type Error = Infallible;

    fn review(&self, _request: &ReviewRequest) -> Result<ReviewDecision, Self::Error> {
        match *self {}
    }
}

/// Analyst slot for controllers built without one
#[derive(Debug, Clone, Copy)]
pub enum NoAnalysis {}

impl Analyst for NoAnalysis {
    type Error = Infallible;

    fn analyze(&self, _request: &AnalysisRequest) -> Result<Vec<ClaimVerdict>, Self::Error> {
        match *self {}
    }
}

/// Why a blocking collaborator call produced nothing
enum CallError {
    Failed(String),
    TimedOut(Duration),
    NoSlot(Duration),
}

impl CallError {
    fn timed_out(&self) -> bool {
        matches!(self, CallError::TimedOut(_) | CallError::NoSlot(_))
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallError::Failed(message) => f.write_str(message),
            CallError::TimedOut(limit) => write!(f, "no answer within {}s", limit.as_secs()),
            CallError::NoSlot(limit) => write!(f, "no free call slot within {}s", limit.as_secs()),
        }
    }
}

type CallOutcome<T> = Result<T, CallError>;

/// Mutable bookkeeping for one session
struct Session {
    state: ControllerState,
    metrics: SessionMetrics,
    rounds: Vec<RoundReport>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: ControllerState::Init,
            metrics: SessionMetrics::new(),
            rounds: Vec::new(),
        }
    }

    fn enter(&mut self, next: ControllerState, report: &mut RoundReport) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(round = report.round, from = %self.state, to = %next, "State transition");
        self.state = next;
        report.transitions.push(next);
    }

    fn fail(
        &mut self,
        report: &mut RoundReport,
        stage: Stage,
        claim_id: Option<ClaimId>,
        domain: Option<String>,
        error: CallError,
    ) {
        warn!(
            round = report.round,
            %stage,
            domain = domain.as_deref().unwrap_or("-"),
            "Collaborator failure: {}",
            error
        );
        self.metrics.record_failure(stage, error.timed_out());
        report.issues.push(RoundIssue::CollaboratorFailure {
            stage,
            claim_id,
            domain,
            message: error.to_string(),
            timed_out: error.timed_out(),
        });
    }

    fn reject(&mut self, report: &mut RoundReport, domain: String, claim_id: ClaimId, reason: String) {
        warn!(round = report.round, %domain, %claim_id, "Assessment rejected: {}", reason);
        self.metrics.record_rejection();
        report.issues.push(RoundIssue::ContractViolation {
            domain,
            claim_id,
            reason,
            rejected: true,
        });
    }
}

/// Drives retrieve, evaluate, score rounds until confidence clears the
/// approval threshold or the iteration cap is hit
///
/// Collaborators are synchronous; every call runs on the blocking pool
/// under its configured timeout. A failing or slow collaborator only
/// empties its own contribution.
///
/// Blocking calls share one pool of `max_concurrent_evaluations` slots for
/// the controller's lifetime. A call abandoned on timeout holds its slot
/// until its thread returns.
pub struct ConvergenceController<R, E, V = NoReview, A = NoAnalysis> {
    retriever: Arc<R>,
    evaluator: Arc<E>,
    reviewer: Option<Arc<V>>,
    analyst: Option<Arc<A>>,
    config: ControllerConfig,
    gatekeeper: Gatekeeper,
    slots: Arc<Semaphore>,
    sinks: Vec<Arc<dyn ReportSink + Send + Sync>>,
}

impl<R, E> ConvergenceController<R, E, NoReview, NoAnalysis> {
    /// Create a controller without a reviewer or analyst
    pub fn new(retriever: R, evaluator: E, config: ControllerConfig) -> Self {
        let gatekeeper = Gatekeeper::new(config.validation.clone());
        let slots = Arc::new(Semaphore::new(config.max_concurrent_evaluations));
        Self {
            retriever: Arc::new(retriever),
            evaluator: Arc::new(evaluator),
            reviewer: None,
            analyst: None,
            config,
            gatekeeper,
            slots,
            sinks: Vec::new(),
        }
    }
}

impl<R, E, V, A> ConvergenceController<R, E, V, A> {
    /// Consult `reviewer` after scoring each round
    pub fn with_reviewer<W>(self, reviewer: W) -> ConvergenceController<R, E, W, A> {
        ConvergenceController {
            retriever: self.retriever,
            evaluator: self.evaluator,
            reviewer: Some(Arc::new(reviewer)),
            analyst: self.analyst,
            config: self.config,
            gatekeeper: self.gatekeeper,
            slots: self.slots,
            sinks: self.sinks,
        }
    }

    /// Ask `analyst` for per-claim verdicts after scoring each round
    ///
    /// Verdicts are reported and shown to the reviewer; they never change
    /// a score.
    pub fn with_analyst<B>(self, analyst: B) -> ConvergenceController<R, E, V, B> {
        ConvergenceController {
            retriever: self.retriever,
            evaluator: self.evaluator,
            reviewer: self.reviewer,
            analyst: Some(Arc::new(analyst)),
            config: self.config,
            gatekeeper: self.gatekeeper,
            slots: self.slots,
            sinks: self.sinks,
        }
    }

    /// Deliver every finished report to `sink`
    pub fn with_sink(mut self, sink: impl ReportSink + Send + Sync + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

impl<R, E, V, A> ConvergenceController<R, E, V, A>
where
    R: Retriever + Send + Sync + 'static,
    R::Error: Display,
    E: Evaluator + Send + Sync + 'static,
    E::Error: Display,
    V: Reviewer + Send + Sync + 'static,
    V::Error: Display,
    A: Analyst + Send + Sync + 'static,
    A::Error: Display,
{
    /// Verify `claims` against a fresh in-memory store
    pub async fn check(&self, claims: &[Claim]) -> Result<SessionReport, ControllerError> {
        let mut store = MemoryStore::new();
        self.run(claims, &mut store, &CancellationToken::new()).await
    }

    /// Run one verification session
    ///
    /// `store` must be empty; it accumulates every round's records and is
    /// left populated for auditing. Cancelling `cancel` abandons in-flight
    /// calls and returns [`ControllerError::Cancelled`]; records already
    /// appended stay in the store.
    pub async fn run<S>(
        &self,
        claims: &[Claim],
        store: &mut S,
        cancel: &CancellationToken,
    ) -> Result<SessionReport, ControllerError>
    where
        S: AssessmentStore<Error = StoreError>,
    {
        self.config.validate().map_err(ControllerError::Configuration)?;
        if claims.is_empty() {
            return Err(ControllerError::NoClaims);
        }
        let mut ids = HashSet::new();
        if let Some(claim) = claims.iter().find(|c| !ids.insert(c.id)) {
            return Err(ControllerError::Configuration(format!(
                "claim {} appears more than once",
                claim.id
            )));
        }
        if !store.is_empty()? {
            return Err(ControllerError::Configuration(
                "assessment store must be empty at session start; reset it first".to_string(),
            ));
        }

        let started = Instant::now();
        let claims: Arc<Vec<Claim>> = Arc::new(claims.to_vec());
        let mut session = Session::new();
        let mut feedback: Option<String> = None;
        let mut round: u32 = 0;

        info!(
            claims = claims.len(),
            max_iterations = self.config.max_iterations,
            threshold = self.config.approval_threshold,
            "Starting verification session"
        );

        let termination = loop {
            if cancel.is_cancelled() {
                info!(rounds_run = round, "Session cancelled");
                return Err(ControllerError::Cancelled { rounds_run: round });
            }

            let mut report = RoundReport::new(round, feedback.take());
            info!(round, feedback = report.feedback.is_some(), "Round started");

            session.enter(ControllerState::Retrieving, &mut report);
            let candidates = self.retrieve(&claims, &mut session, &mut report, cancel).await?;

            session.enter(ControllerState::Evaluating, &mut report);
            self.evaluate(&claims, candidates, store, &mut session, &mut report, cancel)
                .await?;

            session.enter(ControllerState::Scoring, &mut report);
            let (scores, confidence) = self.score(&claims, store)?;
            report.claim_scores = scores;
            report.confidence = confidence;
            let verdicts = self.analyze(&claims, &*store, &mut session, &mut report, cancel).await?;
            report.verdicts = verdicts;

            let vetoed = match self.review(&claims, &*store, &mut session, &mut report, cancel).await? {
                Some(ReviewDecision::RevisionNeeded { feedback: text }) => {
                    session.metrics.record_veto();
                    feedback = Some(text);
                    true
                }
                _ => false,
            };

            session.metrics.record_round();
            info!(
                round,
                confidence,
                committed = report.records_committed,
                issues = report.issues.len(),
                "Round finished"
            );

            round += 1;
            let decision = if confidence >= self.config.approval_threshold && !vetoed {
                Some(Termination::Approved)
            } else if round >= self.config.max_iterations {
                Some(Termination::MaxIterationsReached)
            } else {
                None
            };

            if let Some(termination) = decision {
                session.enter(ControllerState::Stopped(termination), &mut report);
                session.rounds.push(report);
                break termination;
            }
            if vetoed && confidence >= self.config.approval_threshold {
                debug!(round = round - 1, "Reviewer vetoed approval; continuing");
            }
            session.rounds.push(report);
        };

        session.metrics.total_runtime_ms = started.elapsed().as_millis() as u64;
        let report = self.finish(termination, round, session);
        for sink in &self.sinks {
            sink.emit(&report);
        }
        Ok(report)
    }

    /// Ask the retriever for candidates for every claim
    ///
    /// Returns `(claim index, candidate)` pairs in claim order with
    /// excluded origins and repeated domains removed.
    async fn retrieve(
        &self,
        claims: &Arc<Vec<Claim>>,
        session: &mut Session,
        report: &mut RoundReport,
        cancel: &CancellationToken,
    ) -> Result<Vec<(usize, CandidateSource)>, ControllerError> {
        let jobs: Vec<_> = (0..claims.len())
            .map(|idx| {
                let retriever = Arc::clone(&self.retriever);
                let claims = Arc::clone(claims);
                move || retriever.find(&claims[idx]).map_err(|e| e.to_string())
            })
            .collect();

        let outcomes = self
            .fan_out(jobs, self.config.retrieval_timeout(), cancel, report.round)
            .await?;

        let mut selected = Vec::new();
        for (idx, outcome) in outcomes.into_iter().enumerate() {
            let claim = &claims[idx];
            let candidates = match outcome {
                Ok(candidates) => candidates,
                Err(error) => {
                    session.fail(report, Stage::Retrieval, Some(claim.id), None, error);
                    continue;
                }
            };

            session.metrics.record_candidates(candidates.len());
            report.candidates_found += candidates.len();
            debug!(claim_id = %claim.id, candidates = candidates.len(), "Candidates retrieved");

            let mut seen = HashSet::new();
            for candidate in candidates {
                if claim.excludes_domain(&candidate.domain) {
                    debug!(domain = %candidate.domain, claim_id = %claim.id, "Dropping claim's own origin");
                    session.metrics.record_excluded_origin();
                    continue;
                }
                if !seen.insert(normalize_domain(&candidate.domain)) {
                    warn!(domain = %candidate.domain, claim_id = %claim.id, "Dropping repeated domain");
                    session.metrics.record_duplicate();
                    continue;
                }
                selected.push((idx, candidate));
            }
        }

        report.candidates_evaluated = selected.len();
        Ok(selected)
    }

    /// Evaluate candidates, screen the assessments and commit them
    async fn evaluate<S>(
        &self,
        claims: &Arc<Vec<Claim>>,
        candidates: Vec<(usize, CandidateSource)>,
        store: &mut S,
        session: &mut Session,
        report: &mut RoundReport,
        cancel: &CancellationToken,
    ) -> Result<(), ControllerError>
    where
        S: AssessmentStore<Error = StoreError>,
    {
        let context = EvaluationContext {
            round: report.round,
            feedback: report.feedback.clone(),
        };

        let mut labels = Vec::with_capacity(candidates.len());
        let mut jobs = Vec::with_capacity(candidates.len());
        for (idx, candidate) in candidates {
            labels.push((claims[idx].id, candidate.domain.clone()));
            let evaluator = Arc::clone(&self.evaluator);
            let claims = Arc::clone(claims);
            let context = context.clone();
            jobs.push(move || {
                evaluator
                    .assess(&candidate, &claims[idx], &context)
                    .map_err(|e| e.to_string())
            });
            session.metrics.record_evaluation();
        }

        let outcomes = self
            .fan_out(jobs, self.config.evaluation_timeout(), cancel, report.round)
            .await?;

        for ((claim_id, domain), outcome) in labels.into_iter().zip(outcomes) {
            let assessment = match outcome {
                Ok(assessment) => assessment,
                Err(error) => {
                    session.fail(report, Stage::Evaluation, Some(claim_id), Some(domain), error);
                    continue;
                }
            };

            let screened = self.gatekeeper.screen(assessment, claims);
            if !screened.is_accepted() {
                let reason = screened
                    .reasons
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                session.reject(report, screened.assessment.domain, screened.assessment.claim_id, reason);
                continue;
            }

            let assessment = screened.assessment;
            if assessment.claim_id != claim_id {
                let reason = format!(
                    "assessment names claim {} but the source was retrieved for claim {}",
                    assessment.claim_id, claim_id
                );
                session.reject(report, assessment.domain, claim_id, reason);
                continue;
            }

            let own_origin = claims
                .iter()
                .any(|c| c.id == claim_id && c.excludes_domain(&assessment.domain));
            if own_origin {
                let reason = "assessment comes from the claim's own origin".to_string();
                session.reject(report, assessment.domain, claim_id, reason);
                continue;
            }

            if !screened.adjustments.is_empty() {
                session.metrics.record_clamp();
                report.issues.push(RoundIssue::ContractViolation {
                    domain: assessment.domain.clone(),
                    claim_id: assessment.claim_id,
                    reason: screened
                        .adjustments
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; "),
                    rejected: false,
                });
            }

            let (domain, claim_id) = (assessment.domain.clone(), assessment.claim_id);
            match store.append(AssessmentRecord::new(report.round, assessment)) {
                Ok(()) => {
                    session.metrics.record_commit();
                    report.records_committed += 1;
                }
                Err(e) if e.is_duplicate() => session.reject(report, domain, claim_id, e.to_string()),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Aggregate every stored record and normalize
    fn score<S>(&self, claims: &[Claim], store: &S) -> Result<(Vec<ClaimScore>, f64), ControllerError>
    where
        S: AssessmentStore<Error = StoreError>,
    {
        let records = store.query(&AssessmentQuery::default())?;
        let evidence = aggregate_all(
            &self.config.weighting_policy(),
            claims,
            records.iter().map(|r| &r.assessment),
        );
        let confidence = normalize(&evidence, self.config.decisive_threshold)?;

        let scores = claim_scores(&evidence, self.config.decisive_threshold);
        let ordered = claims
            .iter()
            .filter_map(|c| scores.iter().find(|s| s.claim_id == c.id).copied())
            .collect();

        Ok((ordered, confidence))
    }

    /// Ask the analyst, if any, for per-claim verdicts
    ///
    /// An analyst failure is reported and leaves the round without verdicts.
    async fn analyze<S>(
        &self,
        claims: &Arc<Vec<Claim>>,
        store: &S,
        session: &mut Session,
        report: &mut RoundReport,
        cancel: &CancellationToken,
    ) -> Result<Vec<ClaimVerdict>, ControllerError>
    where
        S: AssessmentStore<Error = StoreError>,
    {
        let Some(analyst) = &self.analyst else {
            return Ok(Vec::new());
        };

        let request = AnalysisRequest {
            round: report.round,
            claims: claims.to_vec(),
            claim_scores: report.claim_scores.clone(),
            assessments: ledger(store)?,
            feedback: report.feedback.clone(),
        };
        let analyst = Arc::clone(analyst);
        let job = move || analyst.analyze(&request).map_err(|e| e.to_string());

        match self.call_one(job, self.config.analysis_timeout(), cancel, report.round).await? {
            Ok(verdicts) => Ok(in_claim_order(claims, verdicts, report.round)),
            Err(error) => {
                session.fail(report, Stage::Analysis, None, None, error);
                Ok(Vec::new())
            }
        }
    }

    /// Consult the reviewer, if any
    ///
    /// A reviewer failure is reported and treated as no verdict.
    async fn review<S>(
        &self,
        claims: &Arc<Vec<Claim>>,
        store: &S,
        session: &mut Session,
        report: &mut RoundReport,
        cancel: &CancellationToken,
    ) -> Result<Option<ReviewDecision>, ControllerError>
    where
        S: AssessmentStore<Error = StoreError>,
    {
        let Some(reviewer) = &self.reviewer else {
            return Ok(None);
        };

        let request = ReviewRequest {
            round: report.round,
            claims: claims.to_vec(),
            claim_scores: report.claim_scores.clone(),
            confidence: report.confidence,
            assessments: ledger(store)?,
            verdicts: report.verdicts.clone(),
        };
        let reviewer = Arc::clone(reviewer);
        let job = move || reviewer.review(&request).map_err(|e| e.to_string());

        match self.call_one(job, self.config.review_timeout(), cancel, report.round).await? {
            Ok(decision) => {
                if let ReviewDecision::RevisionNeeded { feedback } = &decision {
                    info!(round = report.round, %feedback, "Reviewer requested a revision");
                }
                report.review = Some(decision.clone());
                Ok(Some(decision))
            }
            Err(error) => {
                session.fail(report, Stage::Review, None, None, error);
                Ok(None)
            }
        }
    }

    /// Run blocking jobs with bounded concurrency, each under `limit`
    ///
    /// Outcomes come back in job order. Cancellation aborts whatever is
    /// still in flight.
    async fn fan_out<T, F>(
        &self,
        jobs: Vec<F>,
        limit: Duration,
        cancel: &CancellationToken,
        rounds_run: u32,
    ) -> Result<Vec<CallOutcome<T>>, ControllerError>
    where
        F: FnOnce() -> Result<T, String> + Send + 'static,
        T: Send + 'static,
    {
        let mut set = JoinSet::new();
        let total = jobs.len();

        for (idx, job) in jobs.into_iter().enumerate() {
            let slots = Arc::clone(&self.slots);
            set.spawn(async move { (idx, call_blocking(slots, limit, job).await) });
        }

        let mut outcomes: Vec<Option<CallOutcome<T>>> = (0..total).map(|_| None).collect();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    set.abort_all();
                    info!(in_flight = set.len(), "Cancellation requested; abandoning calls");
                    return Err(ControllerError::Cancelled { rounds_run });
                }
                joined = set.join_next() => match joined {
                    None => break,
                    Some(Ok((idx, outcome))) => outcomes[idx] = Some(outcome),
                    Some(Err(e)) => warn!("Collaborator task failed: {}", e),
                },
            }
        }

        Ok(outcomes
            .into_iter()
            .map(|o| o.unwrap_or_else(|| Err(CallError::Failed("collaborator task panicked".to_string()))))
            .collect())
    }

    /// Run a single blocking job through [`fan_out`](Self::fan_out)
    async fn call_one<T, F>(
        &self,
        job: F,
        limit: Duration,
        cancel: &CancellationToken,
        rounds_run: u32,
    ) -> Result<CallOutcome<T>, ControllerError>
    where
        F: FnOnce() -> Result<T, String> + Send + 'static,
        T: Send + 'static,
    {
        Ok(self
            .fan_out(vec![job], limit, cancel, rounds_run)
            .await?
            .into_iter()
            .next()
            .unwrap_or_else(|| Err(CallError::Failed("collaborator produced no outcome".to_string()))))
    }

    fn finish(&self, termination: Termination, rounds_run: u32, session: Session) -> SessionReport {
        let last = session.rounds.last();
        let final_confidence = last.map_or(0.0, |r| r.confidence);
        let claim_scores = last.map(|r| r.claim_scores.clone()).unwrap_or_default();
        let verdicts = last.map(|r| r.verdicts.clone()).unwrap_or_default();

        let note = match termination {
            Termination::Approved => None,
            Termination::MaxIterationsReached
                if final_confidence >= self.config.approval_threshold =>
            {
                Some(format!(
                    "Confidence {:.3} cleared the approval threshold {:.2}, but the reviewer requested a revision in the final round",
                    final_confidence, self.config.approval_threshold
                ))
            }
            Termination::MaxIterationsReached => Some(format!(
                "Confidence {:.3} did not reach the approval threshold {:.2} within {} rounds",
                final_confidence, self.config.approval_threshold, rounds_run
            )),
        };

        info!(%termination, confidence = final_confidence, rounds_run, "Session stopped");

        SessionReport {
            final_confidence,
            claim_scores,
            verdicts,
            termination,
            rounds_run,
            rounds: session.rounds,
            metrics: session.metrics,
            note,
        }
    }
}

/// Every assessment in the ledger, in insertion order
fn ledger<S>(store: &S) -> Result<Vec<SourceAssessment>, StoreError>
where
    S: AssessmentStore<Error = StoreError>,
{
    Ok(store
        .query(&AssessmentQuery::default())?
        .into_iter()
        .map(|r| r.assessment)
        .collect())
}

/// Keep one verdict per session claim, in claim order
fn in_claim_order(claims: &[Claim], verdicts: Vec<ClaimVerdict>, round: u32) -> Vec<ClaimVerdict> {
    let mut ordered: Vec<Option<ClaimVerdict>> = vec![None; claims.len()];
    for verdict in verdicts {
        match claims.iter().position(|c| c.id == verdict.claim_id) {
            Some(idx) if ordered[idx].is_none() => ordered[idx] = Some(verdict),
            Some(_) => debug!(round, claim_id = %verdict.claim_id, "Dropping repeated verdict"),
            None => warn!(round, claim_id = %verdict.claim_id, "Dropping verdict for unknown claim"),
        }
    }
    ordered.into_iter().flatten().collect()
}

/// Run one synchronous collaborator call on the blocking pool under `limit`
///
/// The slot permit moves into the blocking closure, so a call abandoned on
/// timeout keeps its slot until the thread returns. Waiting for a slot is
/// bounded by `limit` as well.
async fn call_blocking<T, F>(slots: Arc<Semaphore>, limit: Duration, job: F) -> CallOutcome<T>
where
    F: FnOnce() -> Result<T, String> + Send + 'static,
    T: Send + 'static,
{
    let permit = match timeout(limit, slots.acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(e)) => return Err(CallError::Failed(format!("Call slots closed: {}", e))),
        Err(_) => return Err(CallError::NoSlot(limit)),
    };

    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job()
    });

    match timeout(limit, task).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(message))) => Err(CallError::Failed(message)),
        Ok(Err(e)) => Err(CallError::Failed(format!("Task join error: {}", e))),
        Err(_) => Err(CallError::TimedOut(limit)),
    }
}
