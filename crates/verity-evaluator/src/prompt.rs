//! Prompt construction for stance judgment and round review

use verity_domain::traits::{AnalysisRequest, EvaluationContext, ReviewRequest};
use verity_domain::{CandidateSource, Claim, ClaimId, ClaimScore, SourceAssessment};

/// JSON schema for stance judgments (forwarded to providers with JSON mode)
pub const STANCE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "stance": {"type": "string", "enum": ["supports", "opposes", "neutral"]},
    "reasoning": {"type": "string"}
  },
  "required": ["stance", "reasoning"]
}"#;

/// JSON schema for review decisions
pub const REVIEW_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "status": {"type": "string", "enum": ["Approved", "Revision Needed"]},
    "feedback": {"type": "string"}
  },
  "required": ["status"]
}"#;

/// JSON schema for analyst reports
pub const ANALYSIS_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "verdicts": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "claim": {"type": "integer"},
          "verdict": {"type": "string", "enum": ["Accurate", "Mostly Accurate", "Mixed", "Misleading", "Inaccurate", "Unverifiable"]},
          "justification": {"type": "string"}
        },
        "required": ["claim", "verdict", "justification"]
      }
    }
  },
  "required": ["verdicts"]
}"#;

/// Builds the prompt asking for one source's stance toward one claim
pub struct StancePromptBuilder<'a> {
    claim: &'a Claim,
    candidate: &'a CandidateSource,
    context: &'a EvaluationContext,
    max_source_chars: usize,
}

impl<'a> StancePromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(claim: &'a Claim, candidate: &'a CandidateSource, context: &'a EvaluationContext) -> Self {
        Self {
            claim,
            candidate,
            context,
            max_source_chars: usize::MAX,
        }
    }

    /// Truncate the source text to at most `limit` characters
    pub fn with_max_source_chars(mut self, limit: usize) -> Self {
        self.max_source_chars = limit;
        self
    }

    /// Build the complete stance prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(STANCE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Claim: {}\n", self.claim.text));
        prompt.push_str(&format!("Source domain: {}\n", self.candidate.domain));
        if let Some(url) = &self.candidate.url {
            prompt.push_str(&format!("Source URL: {}\n", url));
        }
        if let Some(date) = &self.candidate.published_date {
            prompt.push_str(&format!("Published: {}\n", date));
        }
        prompt.push('\n');

        if let Some(feedback) = &self.context.feedback {
            prompt.push_str("Reviewer feedback from the previous round (address it):\n");
            prompt.push_str(feedback);
            prompt.push_str("\n\n");
        }

        prompt.push_str("Article text:\n---\n");
        prompt.push_str(&truncate_chars(&self.candidate.raw_text, self.max_source_chars));
        prompt.push_str("\n---\n\n");

        prompt.push_str(STANCE_OUTPUT_FORMAT);
        prompt
    }
}

/// Builds the prompt asking a reviewer to approve or send back a round
pub struct ReviewPromptBuilder<'a> {
    request: &'a ReviewRequest,
    assessment_limit: usize,
}

impl<'a> ReviewPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(request: &'a ReviewRequest) -> Self {
        Self {
            request,
            assessment_limit: usize::MAX,
        }
    }

    /// List at most `limit` assessments
    pub fn with_assessment_limit(mut self, limit: usize) -> Self {
        self.assessment_limit = limit;
        self
    }

    /// Build the complete review prompt
    pub fn build(&self) -> String {
        let request = self.request;
        let mut prompt = String::new();

        prompt.push_str(REVIEW_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!(
            "Round {} overall confidence: {:.3}\n\n",
            request.round, request.confidence
        ));

        push_claims(&mut prompt, &request.claims, &request.claim_scores);
        push_evidence(&mut prompt, &request.claims, &request.assessments, self.assessment_limit);

        if !request.verdicts.is_empty() {
            prompt.push_str("Analyst report:\n");
            for v in &request.verdicts {
                prompt.push_str(&format!(
                    "- claim {}: {}. {}\n",
                    claim_number(&request.claims, v.claim_id),
                    v.verdict,
                    v.justification
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str(REVIEW_OUTPUT_FORMAT);
        prompt
    }
}

/// Builds the prompt asking the analyst for a verdict on every claim
pub struct AnalysisPromptBuilder<'a> {
    request: &'a AnalysisRequest,
    assessment_limit: usize,
}

impl<'a> AnalysisPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(request: &'a AnalysisRequest) -> Self {
        Self {
            request,
            assessment_limit: usize::MAX,
        }
    }

    /// List at most `limit` assessments
    pub fn with_assessment_limit(mut self, limit: usize) -> Self {
        self.assessment_limit = limit;
        self
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let request = self.request;
        let mut prompt = String::new();

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        if let Some(feedback) = &request.feedback {
            prompt.push_str("Adjudicator feedback from the previous round (address it):\n");
            prompt.push_str(feedback);
            prompt.push_str("\n\n");
        }

        push_claims(&mut prompt, &request.claims, &request.claim_scores);
        push_evidence(&mut prompt, &request.claims, &request.assessments, self.assessment_limit);

        prompt.push_str(ANALYSIS_OUTPUT_FORMAT);
        prompt
    }
}

/// 1-based position of a claim in the prompt listing (0 when absent)
fn claim_number(claims: &[Claim], claim_id: ClaimId) -> usize {
    claims.iter().position(|c| c.id == claim_id).map_or(0, |i| i + 1)
}

fn push_claims(prompt: &mut String, claims: &[Claim], scores: &[ClaimScore]) {
    prompt.push_str("Claims:\n");
    for (i, claim) in claims.iter().enumerate() {
        match scores.iter().find(|s| s.claim_id == claim.id) {
            Some(s) => prompt.push_str(&format!(
                "{}. {} (evidence {:.3}, confidence {:.3})\n",
                i + 1,
                claim.text,
                s.evidence_score,
                s.confidence_score
            )),
            None => prompt.push_str(&format!("{}. {} (no score)\n", i + 1, claim.text)),
        }
    }
    prompt.push('\n');
}

fn push_evidence(prompt: &mut String, claims: &[Claim], assessments: &[SourceAssessment], limit: usize) {
    prompt.push_str("Evidence:\n");
    if assessments.is_empty() {
        prompt.push_str("(none)\n");
    }
    for a in assessments.iter().take(limit) {
        prompt.push_str(&format!(
            "- claim {} | {} | credibility {:.2} | recency {:.2} | {} | {}\n",
            claim_number(claims, a.claim_id),
            a.domain,
            a.credibility_score,
            a.recency_score,
            a.stance.as_str(),
            a.reasoning
        ));
    }
    if assessments.len() > limit {
        prompt.push_str(&format!("({} more not shown)\n", assessments.len() - limit));
    }
    prompt.push('\n');
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

const STANCE_INSTRUCTIONS: &str = r#"You are a fact-checking assistant for a neutral organization.
Read the article text and decide the stance it takes toward the claim.

Rules:
- "supports": the article presents evidence that the claim is true
- "opposes": the article presents evidence that the claim is false
- "neutral": the article mentions the topic without evidence either way
- Judge only what the article says, not what you believe
- Write exactly one sentence of reasoning"#;

const STANCE_OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{"stance": "supports" | "opposes" | "neutral", "reasoning": "one sentence"}"#;

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a senior analyst writing the final fact-checking report.
Weigh the evidence for each claim; do not treat all sources equally.

Rules:
- Give much more weight to high-credibility sources; use low-credibility ones only for context
- If credible sources agree, state the consensus; if they conflict, explain the disagreement
- Choose one verdict per claim: Accurate, Mostly Accurate, Mixed, Misleading, Inaccurate, Unverifiable
- Use Unverifiable when credible evidence is missing
- Begin each justification with the verdict, then cite the strongest sources by domain
- Keep each justification short"#;

const ANALYSIS_OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{"verdicts": [{"claim": <claim number>, "verdict": "<verdict>", "justification": "short narrative"}]}"#;

const REVIEW_INSTRUCTIONS: &str = r#"You are the final adjudicator of a fact-checking round. Be strictly logical and impartial.

Check that:
1. The confidence reflects the evidence: high confidence needs agreement among several credible sources
2. Conflicting or low-credibility evidence is not reported with high confidence
3. Every claim has been addressed
4. Each analyst verdict follows from its justification, and the justification from the evidence

If every check passes, approve. Otherwise explain exactly what the next round must fix.
Vague feedback such as "the evidence is weak" is not acceptable; name the claim and the gap."#;

const REVIEW_OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{"status": "Approved" | "Revision Needed", "feedback": "required when revision is needed"}"#;
