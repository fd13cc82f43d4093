//! LLM-backed source evaluator

use crate::analytics::SourceAnalytics;
use crate::config::EvaluatorConfig;
use crate::error::EvaluatorError;
use crate::parser::parse_stance_response;
use crate::prompt::{StancePromptBuilder, STANCE_SCHEMA};
use crate::recency::RecencyScorer;
use std::fmt::Display;
use tracing::debug;
use verity_domain::traits::{EvaluationContext, Evaluator, LlmProvider};
use verity_domain::{normalize_domain, Bias, CandidateSource, Claim, SourceAssessment};

/// Evaluator that asks a language model for stance only
///
/// Credibility and bias come from the [`SourceAnalytics`] table and recency
/// from the [`RecencyScorer`], so the only free-text judgment in an
/// assessment is the stance and its reasoning.
pub struct LlmEvaluator<L> {
    llm: L,
    analytics: SourceAnalytics,
    recency: RecencyScorer,
    config: EvaluatorConfig,
}

impl<L> LlmEvaluator<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an evaluator with default configuration
    pub fn new(llm: L, analytics: SourceAnalytics) -> Self {
        let config = EvaluatorConfig::default();
        Self {
            llm,
            analytics,
            recency: RecencyScorer::new(config.recency.clone()),
            config,
        }
    }

    /// Replace the configuration (recency bands included)
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.recency = RecencyScorer::new(config.recency.clone());
        self.config = config;
        self
    }

    /// Replace the recency scorer, e.g. one pinned to a fixed clock
    pub fn with_recency(mut self, recency: RecencyScorer) -> Self {
        self.recency = recency;
        self
    }

    /// Source analytics table in use
    pub fn analytics(&self) -> &SourceAnalytics {
        &self.analytics
    }

    fn call_llm(&self, prompt: &str) -> Result<String, EvaluatorError> {
        let result = if self.config.structured_output {
            self.llm.generate_structured(prompt, STANCE_SCHEMA)
        } else {
            self.llm.generate(prompt)
        };
        result.map_err(|e| EvaluatorError::Llm(e.to_string()))
    }
}

impl<L> Evaluator for LlmEvaluator<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = EvaluatorError;

    fn assess(
        &self,
        candidate: &CandidateSource,
        claim: &Claim,
        context: &EvaluationContext,
    ) -> Result<SourceAssessment, Self::Error> {
        let prompt = StancePromptBuilder::new(claim, candidate, context)
            .with_max_source_chars(self.config.max_source_chars)
            .build();

        debug!(
            domain = %candidate.domain,
            claim_id = %claim.id,
            round = context.round,
            prompt_len = prompt.len(),
            "Requesting stance judgment"
        );

        let response = self.call_llm(&prompt)?;
        let judgment = parse_stance_response(&response)?;

        let domain = normalize_domain(&candidate.domain);
        let profile = self.analytics.lookup(&domain);
        let recency_score = self.recency.score(candidate.published_date.as_deref());

        debug!(
            domain = %domain,
            stance = judgment.stance.as_str(),
            credibility = profile.credibility_score,
            recency = recency_score,
            "Source assessed"
        );

        Ok(SourceAssessment {
            domain,
            claim_id: claim.id,
            credibility_score: profile.credibility_score,
            bias: Bias::Label(profile.bias_label),
            recency_score,
            stance: judgment.stance,
            reasoning: judgment.reasoning,
        })
    }
}
