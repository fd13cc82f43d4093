//! Parse LLM output into claim candidates

use crate::error::ExtractorError;
use crate::types::ClaimCandidate;
use serde_json::Value;
use tracing::warn;

/// Parse LLM JSON response into claim candidates
///
/// Accepted shapes:
/// - `{"claims": ["...", ...]}`
/// - `{"claims": [{"claim": "..."}, ...]}`
/// - `["...", ...]` or `[{"claim": "..."}, ...]`
///
/// Entries that are neither a string nor an object with a string `claim`
/// (or `text`) field are skipped with a warning.
pub fn parse_llm_response(response: &str, min_chars: usize) -> Result<Vec<ClaimCandidate>, ExtractorError> {
    let json_str = extract_json(response)?;
    let json: Value = serde_json::from_str(&json_str)?;

    let entries = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("claims")
            .and_then(Value::as_array)
            .ok_or_else(|| ExtractorError::InvalidFormat("Expected a 'claims' array".to_string()))?,
        _ => {
            return Err(ExtractorError::InvalidFormat(
                "Expected a JSON array or object".to_string(),
            ))
        }
    };

    let mut candidates = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        let Some(text) = claim_text(entry) else {
            warn!("Skipping claim {}: not a string or claim object", idx);
            continue;
        };

        let candidate = ClaimCandidate {
            text: text.trim().to_string(),
        };
        if let Err(e) = candidate.validate(min_chars) {
            warn!("Claim {} failed validation: {}", idx, e);
            continue;
        }
        candidates.push(candidate);
    }

    Ok(candidates)
}

fn claim_text(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj
            .get("claim")
            .or_else(|| obj.get("text"))
            .and_then(Value::as_str),
        _ => None,
    }
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_claims_object_of_strings() {
        let response = r#"{"claims": [
            "The WHO declared COVID-19 a pandemic on March 11, 2020.",
            "Mars has two moons named Phobos and Deimos."
        ]}"#;

        let claims = parse_llm_response(response, 1).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].text, "Mars has two moons named Phobos and Deimos.");
    }

    #[test]
    fn test_parse_array_of_claim_objects() {
        let response = r#"[{"claim": "Water boils at 100 C at sea level."}, {"text": "The sky is blue."}]"#;
        let claims = parse_llm_response(response, 1).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].text, "The sky is blue.");
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"claims\": [\"Bob lives in Seattle.\"]}\n```";
        let claims = parse_llm_response(response, 1).unwrap();
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_llm_response("This is not JSON", 1);
        assert!(matches!(result, Err(ExtractorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_object_without_claims() {
        let result = parse_llm_response(r#"{"facts": []}"#, 1);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_partial_success() {
        let response = r#"[
            "Alice works at Acme.",
            42,
            {"claim": ""},
            {"claim": "Charlie lives in Portland."},
            "short"
        ]"#;

        let claims = parse_llm_response(response, 8).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].text, "Alice works at Acme.");
        assert_eq!(claims[1].text, "Charlie lives in Portland.");
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let result = extract_json("```\n{\"key\": \"value\"}\n```").unwrap();
        assert!(result.contains("key"));
    }
}
