//! LLM-backed round reviewer

use crate::config::EvaluatorConfig;
use crate::error::EvaluatorError;
use crate::parser::parse_review_response;
use crate::prompt::{ReviewPromptBuilder, REVIEW_SCHEMA};
use std::fmt::Display;
use tracing::{debug, info};
use verity_domain::traits::{LlmProvider, ReviewDecision, ReviewRequest, Reviewer};

/// Reviewer that asks a language model to approve or send back a round
pub struct LlmReviewer<L> {
    llm: L,
    config: EvaluatorConfig,
}

impl<L> LlmReviewer<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a reviewer with default configuration
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

impl<L> Reviewer for LlmReviewer<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = EvaluatorError;

    fn review(&self, request: &ReviewRequest) -> Result<ReviewDecision, Self::Error> {
        let prompt = ReviewPromptBuilder::new(request)
            .with_assessment_limit(self.config.review_assessment_limit)
            .build();

        debug!(round = request.round, prompt_len = prompt.len(), "Requesting review");

        let response = if self.config.structured_output {
            self.llm.generate_structured(&prompt, REVIEW_SCHEMA)
        } else {
            self.llm.generate(&prompt)
        }
        .map_err(|e| EvaluatorError::Llm(e.to_string()))?;

        let decision = parse_review_response(&response)?;

        match &decision {
            ReviewDecision::Approved => info!(round = request.round, "Reviewer approved round"),
            ReviewDecision::RevisionNeeded { feedback } => {
                info!(round = request.round, feedback = %feedback, "Reviewer requested revision")
            }
        }

        Ok(decision)
    }
}
