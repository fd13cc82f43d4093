//! Adapter tests against the scripted mock provider

use crate::*;
use chrono::{TimeZone, Utc};
use verity_domain::traits::{
    AnalysisRequest, Analyst, EvaluationContext, Evaluator, ReviewDecision, ReviewRequest, Reviewer,
};
use verity_domain::{Bias, BiasLabel, CandidateSource, Claim, ClaimScore, Stance, Verdict};
use verity_llm::MockProvider;

fn analytics() -> SourceAnalytics {
    SourceAnalytics::from_toml(
        r#"
        [sources."nasa.gov"]
        credibility_score = 0.95
        bias_label = "center"

        [sources."partisan.example"]
        credibility_score = 0.4
        bias_label = "leans left"
        "#,
    )
    .unwrap()
}

fn fixed_clock() -> RecencyScorer {
    RecencyScorer::default().at(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap())
}

#[test]
fn test_assessment_combines_table_clock_and_stance() {
    let llm = MockProvider::new(r#"{"stance": "supports", "reasoning": "Fact sheet lists both."}"#);
    let evaluator = LlmEvaluator::new(llm, analytics()).with_recency(fixed_clock());

    let claim = Claim::new("Mars has two moons named Phobos and Deimos.");
    let source = CandidateSource::new("WWW.NASA.gov", "Mars has two small moons.")
        .with_published_date("2025-04-20");

    let a = evaluator
        .assess(&source, &claim, &EvaluationContext::default())
        .unwrap();

    assert_eq!(a.domain, "nasa.gov");
    assert_eq!(a.claim_id, claim.id);
    assert_eq!(a.credibility_score, 0.95);
    assert_eq!(a.bias, Bias::Label(BiasLabel::Center));
    assert_eq!(a.recency_score, 0.8);
    assert_eq!(a.stance, Stance::Supports);
    assert_eq!(a.reasoning, "Fact sheet lists both.");
}

#[test]
fn test_unknown_outlet_and_missing_date() {
    let llm = MockProvider::new(r#"{"stance": "opposes", "reasoning": "Disputes it."}"#);
    let evaluator = LlmEvaluator::new(llm, analytics()).with_recency(fixed_clock());

    let claim = Claim::new("c");
    let source = CandidateSource::new("random.blog", "text");

    let a = evaluator
        .assess(&source, &claim, &EvaluationContext::default())
        .unwrap();

    assert_eq!(a.credibility_score, DEFAULT_CREDIBILITY);
    assert_eq!(a.bias, Bias::Label(BiasLabel::Center));
    assert_eq!(a.recency_score, 0.0);
}

#[test]
fn test_feedback_reaches_the_prompt() {
    let llm = MockProvider::new(r#"{"stance": "neutral", "reasoning": "n/a"}"#);
    let evaluator = LlmEvaluator::new(llm.clone(), analytics());

    let claim = Claim::new("c");
    let source = CandidateSource::new("nasa.gov", "text");
    let context = EvaluationContext {
        round: 1,
        feedback: Some("Weigh the NASA source against the blog.".to_string()),
    };

    evaluator.assess(&source, &claim, &context).unwrap();

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Weigh the NASA source against the blog."));
}

#[test]
fn test_llm_failure_surfaces_as_error() {
    let llm = MockProvider::default();
    llm.add_error_containing("partisan.example");
    let evaluator = LlmEvaluator::new(llm, analytics());

    let claim = Claim::new("c");
    let source = CandidateSource::new("partisan.example", "text");

    let result = evaluator.assess(&source, &claim, &EvaluationContext::default());
    assert!(matches!(result, Err(EvaluatorError::Llm(_))));
}

#[test]
fn test_malformed_response_is_error() {
    let llm = MockProvider::new("The article supports the claim.");
    let evaluator = LlmEvaluator::new(llm, analytics());

    let result = evaluator.assess(
        &CandidateSource::new("nasa.gov", "text"),
        &Claim::new("c"),
        &EvaluationContext::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_config_bands_apply() {
    let config = EvaluatorConfig {
        recency: RecencyBands {
            undated_score: 0.25,
            ..Default::default()
        },
        ..Default::default()
    };
    let llm = MockProvider::new(r#"{"stance": "supports"}"#);
    let evaluator = LlmEvaluator::new(llm, analytics()).with_config(config);

    let a = evaluator
        .assess(
            &CandidateSource::new("nasa.gov", "text"),
            &Claim::new("c"),
            &EvaluationContext::default(),
        )
        .unwrap();
    assert_eq!(a.recency_score, 0.25);
}

fn review_request() -> ReviewRequest {
    let claim = Claim::new("Mars has two moons.");
    ReviewRequest {
        round: 0,
        claim_scores: vec![ClaimScore {
            claim_id: claim.id,
            evidence_score: 0.9,
            confidence_score: 0.716,
        }],
        claims: vec![claim],
        confidence: 0.716,
        assessments: Vec::new(),
        verdicts: Vec::new(),
    }
}

#[test]
fn test_reviewer_approves() {
    let reviewer = LlmReviewer::new(MockProvider::new(r#"{"status": "Approved"}"#));
    assert_eq!(reviewer.review(&review_request()).unwrap(), ReviewDecision::Approved);
}

#[test]
fn test_reviewer_requests_revision() {
    let llm = MockProvider::new(
        r#"```json
{"status": "Revision Needed", "feedback": "Only one source; find another."}
```"#,
    );
    let reviewer = LlmReviewer::new(llm.clone());

    let decision = reviewer.review(&review_request()).unwrap();

    assert_eq!(
        decision,
        ReviewDecision::RevisionNeeded {
            feedback: "Only one source; find another.".to_string()
        }
    );
    assert!(llm.prompts()[0].contains("Mars has two moons."));
}

#[test]
fn test_reviewer_failure() {
    let llm = MockProvider::default();
    llm.push_response("ERROR");
    let reviewer = LlmReviewer::new(llm);

    assert!(reviewer.review(&review_request()).is_err());
}

fn analysis_request(feedback: Option<&str>) -> AnalysisRequest {
    let claim = Claim::new("Mars has two moons.");
    AnalysisRequest {
        round: 1,
        claim_scores: vec![ClaimScore {
            claim_id: claim.id,
            evidence_score: 0.9,
            confidence_score: 0.716,
        }],
        claims: vec![claim],
        assessments: Vec::new(),
        feedback: feedback.map(str::to_string),
    }
}

#[test]
fn test_analyst_writes_verdicts() {
    let llm = MockProvider::new(
        r#"{"verdicts": [{"claim": 1, "verdict": "Accurate", "justification": "NASA lists Phobos and Deimos."}]}"#,
    );
    let analyst = LlmAnalyst::new(llm.clone());
    let request = analysis_request(Some("Name the agency behind the figure."));

    let verdicts = analyst.analyze(&request).unwrap();

    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].claim_id, request.claims[0].id);
    assert_eq!(verdicts[0].verdict, Verdict::Accurate);
    assert!(llm.prompts()[0].contains("Name the agency behind the figure."));
}

#[test]
fn test_analyst_malformed_report_is_error() {
    let analyst = LlmAnalyst::new(MockProvider::new(r#"{"verdicts": [{"claim": 4, "verdict": "Accurate", "justification": "x"}]}"#));
    assert!(matches!(
        analyst.analyze(&analysis_request(None)),
        Err(EvaluatorError::InvalidFormat(_))
    ));
}

#[test]
fn test_analyst_llm_failure() {
    let llm = MockProvider::default();
    llm.push_response("ERROR");
    let analyst = LlmAnalyst::new(llm);

    assert!(matches!(analyst.analyze(&analysis_request(None)), Err(EvaluatorError::Llm(_))));
}
