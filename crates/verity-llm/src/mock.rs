//! Scripted mock provider

use crate::LlmError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use verity_domain::traits::LlmProvider as LlmProviderTrait;

/// Marker response that makes the mock fail instead of answering
const ERROR_SENTINEL: &str = "ERROR";

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<String>,
    exact: HashMap<String, String>,
    containing: Vec<(String, String)>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Resolution order for each prompt:
/// 1. the next queued response, if any
/// 2. an exact-prompt response
/// 3. the first substring rule whose needle occurs in the prompt
/// 4. the default response
///
/// Any resolved response equal to `"ERROR"` is returned as an error.
/// Clones share state, so a provider handed to an adapter can still be
/// inspected by the test that built it.
///
/// # Examples
///
/// ```
/// use verity_llm::MockProvider;
/// use verity_domain::traits::LlmProvider;
///
/// let provider = MockProvider::default();
/// provider.add_response_containing("nasa.gov", "supports");
/// provider.push_response("first");
///
/// assert_eq!(provider.generate("about nasa.gov").unwrap(), "first");
/// assert_eq!(provider.generate("about nasa.gov").unwrap(), "supports");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a one-shot response consumed by the next call
    pub fn push_response(&self, response: impl Into<String>) {
        self.state().queue.push_back(response.into());
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state().exact.insert(prompt.into(), response.into());
    }

    /// Answer any prompt containing `needle`
    pub fn add_response_containing(&self, needle: impl Into<String>, response: impl Into<String>) {
        self.state().containing.push((needle.into(), response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>) {
        self.add_response(prompt, ERROR_SENTINEL);
    }

    /// Configure to return an error for any prompt containing `needle`
    pub fn add_error_containing(&self, needle: impl Into<String>) {
        self.add_response_containing(needle, ERROR_SENTINEL);
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        self.state().prompts.clear();
    }

    fn resolve(&self, prompt: &str) -> Result<String, LlmError> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        let response = state
            .queue
            .pop_front()
            .or_else(|| state.exact.get(prompt).cloned())
            .or_else(|| {
                state
                    .containing
                    .iter()
                    .find(|(needle, _)| prompt.contains(needle.as_str()))
                    .map(|(_, response)| response.clone())
            })
            .unwrap_or_else(|| self.default_response.clone());

        if response == ERROR_SENTINEL {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        Ok(response)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.resolve(prompt)
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.resolve(prompt)
    }
}
