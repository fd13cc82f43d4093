//! LLM-backed analyst

use crate::config::EvaluatorConfig;
use crate::error::EvaluatorError;
use crate::parser::parse_analysis_response;
use crate::prompt::{AnalysisPromptBuilder, ANALYSIS_SCHEMA};
use std::fmt::Display;
use tracing::{debug, info, warn};
use verity_domain::traits::{AnalysisRequest, Analyst, LlmProvider};
use verity_domain::ClaimVerdict;

/// Analyst that asks a language model for a verdict on every claim
pub struct LlmAnalyst<L> {
    llm: L,
    config: EvaluatorConfig,
}

impl<L> LlmAnalyst<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an analyst with default configuration
    pub fn new(llm: L) -> Self {
        Self {
            llm,
            config: EvaluatorConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }
}

impl<L> Analyst for LlmAnalyst<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = EvaluatorError;

    fn analyze(&self, request: &AnalysisRequest) -> Result<Vec<ClaimVerdict>, Self::Error> {
        let prompt = AnalysisPromptBuilder::new(request)
            .with_assessment_limit(self.config.review_assessment_limit)
            .build();

        debug!(round = request.round, prompt_len = prompt.len(), "Requesting analysis");

        let response = if self.config.structured_output {
            self.llm.generate_structured(&prompt, ANALYSIS_SCHEMA)
        } else {
            self.llm.generate(&prompt)
        }
        .map_err(|e| EvaluatorError::Llm(e.to_string()))?;

        let verdicts = parse_analysis_response(&response, &request.claims)?;

        if verdicts.len() < request.claims.len() {
            warn!(
                round = request.round,
                answered = verdicts.len(),
                claims = request.claims.len(),
                "Analyst left claims without a verdict"
            );
        }
        info!(round = request.round, verdicts = verdicts.len(), "Analysis complete");

        Ok(verdicts)
    }
}
