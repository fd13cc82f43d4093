//! LLM prompt construction for claim extraction

/// JSON schema for extraction output
pub const CLAIMS_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "claims": {"type": "array", "items": {"type": "string"}}
  },
  "required": ["claims"]
}"#;

/// Builds prompts for the LLM to extract claims
pub struct PromptBuilder<'a> {
    text: &'a str,
    max_claims: usize,
    part: Option<(usize, usize)>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str, max_claims: usize) -> Self {
        Self {
            text,
            max_claims,
            part: None,
        }
    }

    /// Mark the text as chunk `index` (0-based) of `total`
    pub fn with_part(mut self, index: usize, total: usize) -> Self {
        if total > 1 {
            self.part = Some((index, total));
        }
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "Return at most {} claims, most consequential first.\n\n",
            self.max_claims
        ));

        if let Some((index, total)) = self.part {
            prompt.push_str(&format!(
                "This is part {} of {} of a longer article.\n\n",
                index + 1,
                total
            ));
        }

        prompt.push_str("Text to analyze:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract the verifiable factual claims from the following text.

Rules:
- One idea per claim; split sentences that assert several things
- Each claim must be self-contained: name who or what it is about, and keep dates and figures
- When a claim is a quote, attribute it to the speaker
- Skip opinions, questions and rhetorical statements
- Do not judge whether a claim is true"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{"claims": ["first claim", "second claim"]}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
