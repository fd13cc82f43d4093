//! Parse LLM output into stance judgments and review decisions

use crate::EvaluatorError;
use serde::Deserialize;
use serde_json::Value;
use verity_domain::traits::ReviewDecision;
use verity_domain::{Claim, ClaimVerdict, Stance, Verdict};

/// Stance and reasoning as reported by the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StanceJudgment {
    /// Stance toward the claim
    pub stance: Stance,
    /// One-sentence justification
    pub reasoning: String,
}

#[derive(Deserialize)]
struct RawJudgment {
    stance: String,
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct RawVerdict {
    claim: usize,
    verdict: String,
    #[serde(default)]
    justification: Option<String>,
}

#[derive(Deserialize)]
struct RawReview {
    status: String,
    #[serde(default)]
    feedback: Option<String>,
}

/// Parse a stance response
///
/// Accepts a single object, or an array holding exactly one object (some
/// models wrap every answer in a list).
pub fn parse_stance_response(response: &str) -> Result<StanceJudgment, EvaluatorError> {
    let value = single_object(parse_json(response)?)?;
    let raw: RawJudgment = serde_json::from_value(value)?;

    let stance = Stance::parse(&raw.stance)
        .ok_or_else(|| EvaluatorError::InvalidFormat(format!("Unknown stance '{}'", raw.stance)))?;

    Ok(StanceJudgment {
        stance,
        reasoning: raw.reasoning.unwrap_or_default().trim().to_string(),
    })
}

/// Parse a review response
///
/// `Revision Needed` without feedback is malformed: the next round would
/// have nothing to act on.
pub fn parse_review_response(response: &str) -> Result<ReviewDecision, EvaluatorError> {
    let value = single_object(parse_json(response)?)?;
    let raw: RawReview = serde_json::from_value(value)?;

    let status = raw.status.trim().to_lowercase().replace(['_', '-'], " ");
    match status.as_str() {
        "approved" | "approve" => Ok(ReviewDecision::Approved),
        "revision needed" | "needs revision" | "revise" => {
            let feedback = raw
                .feedback
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .ok_or_else(|| {
                    EvaluatorError::InvalidFormat("Revision requested without feedback".to_string())
                })?;
            Ok(ReviewDecision::RevisionNeeded { feedback })
        }
        _ => Err(EvaluatorError::InvalidFormat(format!(
            "Unknown review status '{}'",
            raw.status
        ))),
    }
}

/// Parse an analyst report into per-claim verdicts
///
/// Claims are referenced by their 1-based position in `claims`. The report
/// may be `{"verdicts": [...]}` or a bare array. A claim named twice keeps
/// its first verdict; the result follows claim order.
pub fn parse_analysis_response(
    response: &str,
    claims: &[Claim],
) -> Result<Vec<ClaimVerdict>, EvaluatorError> {
    let items = match parse_json(response)? {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("verdicts") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EvaluatorError::InvalidFormat(
                    "Expected a 'verdicts' array".to_string(),
                ))
            }
        },
        _ => return Err(EvaluatorError::InvalidFormat("Expected a JSON object".to_string())),
    };

    let mut found: Vec<Option<ClaimVerdict>> = vec![None; claims.len()];
    for item in items {
        let raw: RawVerdict = serde_json::from_value(item)?;

        let claim = raw
            .claim
            .checked_sub(1)
            .and_then(|idx| claims.get(idx).map(|c| (idx, c)));
        let Some((idx, claim)) = claim else {
            return Err(EvaluatorError::InvalidFormat(format!(
                "Verdict for claim {} but only {} claims were listed",
                raw.claim,
                claims.len()
            )));
        };

        let verdict = Verdict::parse(&raw.verdict).ok_or_else(|| {
            EvaluatorError::InvalidFormat(format!("Unknown verdict '{}'", raw.verdict))
        })?;
        let justification = raw
            .justification
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty())
            .ok_or_else(|| {
                EvaluatorError::InvalidFormat(format!("Verdict for claim {} has no justification", raw.claim))
            })?;

        if found[idx].is_none() {
            found[idx] = Some(ClaimVerdict {
                claim_id: claim.id,
                verdict,
                justification,
            });
        }
    }

    Ok(found.into_iter().flatten().collect())
}

fn parse_json(response: &str) -> Result<Value, EvaluatorError> {
    let json_str = extract_json(response)?;
    Ok(serde_json::from_str(&json_str)?)
}

fn single_object(value: Value) -> Result<Value, EvaluatorError> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Array(mut items) if items.len() == 1 && items[0].is_object() => Ok(items.remove(0)),
        Value::Array(items) => Err(EvaluatorError::InvalidFormat(format!(
            "Expected one JSON object, got an array of {}",
            items.len()
        ))),
        _ => Err(EvaluatorError::InvalidFormat("Expected a JSON object".to_string())),
    }
}

/// Extract JSON from response, handling markdown code blocks and chatter
fn extract_json(response: &str) -> Result<String, EvaluatorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(EvaluatorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence, and the closing one when present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        return Ok(lines[1..end].join("\n"));
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }

    // Prose around an object: keep the outermost braces
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Err(EvaluatorError::InvalidFormat("No JSON object in response".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stance_object() {
        let judgment = parse_stance_response(
            r#"{"stance": "supports", "reasoning": "NASA lists both moons."}"#,
        )
        .unwrap();
        assert_eq!(judgment.stance, Stance::Supports);
        assert_eq!(judgment.reasoning, "NASA lists both moons.");
    }

    #[test]
    fn test_parse_stance_with_markdown_wrapper() {
        let response = "```json\n{\"stance\": \"Refutes\", \"reasoning\": \"No.\"}\n```";
        let judgment = parse_stance_response(response).unwrap();
        assert_eq!(judgment.stance, Stance::Opposes);
    }

    #[test]
    fn test_parse_stance_single_element_array() {
        let response = r#"[{"domain": "x.com", "stance": "neutral", "reasoning": "Mentions it."}]"#;
        let judgment = parse_stance_response(response).unwrap();
        assert_eq!(judgment.stance, Stance::Neutral);
    }

    #[test]
    fn test_parse_stance_with_prose() {
        let response = "Sure! Here is my answer: {\"stance\": \"opposes\"} Hope that helps.";
        let judgment = parse_stance_response(response).unwrap();
        assert_eq!(judgment.stance, Stance::Opposes);
        assert_eq!(judgment.reasoning, "");
    }

    #[test]
    fn test_parse_stance_unknown_value() {
        let result = parse_stance_response(r#"{"stance": "maybe"}"#);
        assert!(matches!(result, Err(EvaluatorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_stance_missing_field() {
        let result = parse_stance_response(r#"{"reasoning": "no stance"}"#);
        assert!(matches!(result, Err(EvaluatorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_stance_not_json() {
        assert!(parse_stance_response("I think it supports the claim").is_err());
    }

    #[test]
    fn test_parse_stance_multi_element_array() {
        let response = r#"[{"stance": "supports"}, {"stance": "opposes"}]"#;
        assert!(matches!(
            parse_stance_response(response),
            Err(EvaluatorError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_review_approved() {
        let decision = parse_review_response(r#"{"status": "Approved"}"#).unwrap();
        assert_eq!(decision, ReviewDecision::Approved);
    }

    #[test]
    fn test_parse_review_revision() {
        let decision = parse_review_response(
            r#"{"status": "Revision Needed", "feedback": "Find a primary source for claim 1."}"#,
        )
        .unwrap();
        assert_eq!(
            decision,
            ReviewDecision::RevisionNeeded {
                feedback: "Find a primary source for claim 1.".to_string()
            }
        );
    }

    #[test]
    fn test_parse_review_status_variants() {
        let decision =
            parse_review_response(r#"{"status": "revision_needed", "feedback": "x"}"#).unwrap();
        assert!(matches!(decision, ReviewDecision::RevisionNeeded { .. }));
    }

    #[test]
    fn test_parse_review_revision_without_feedback() {
        let result = parse_review_response(r#"{"status": "Revision Needed", "feedback": "  "}"#);
        assert!(matches!(result, Err(EvaluatorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_review_unknown_status() {
        assert!(parse_review_response(r#"{"status": "Pending"}"#).is_err());
    }

    fn claims() -> Vec<Claim> {
        vec![Claim::new("Water is wet."), Claim::new("Fire is cold.")]
    }

    #[test]
    fn test_parse_analysis_in_claim_order() {
        let claims = claims();
        let response = r#"```json
{"verdicts": [
  {"claim": 2, "verdict": "Inaccurate", "justification": "Refuted by every physics text."},
  {"claim": 1, "verdict": "mostly_accurate", "justification": "True for most liquids."}
]}
```"#;

        let verdicts = parse_analysis_response(response, &claims).unwrap();

        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].claim_id, claims[0].id);
        assert_eq!(verdicts[0].verdict, Verdict::MostlyAccurate);
        assert_eq!(verdicts[1].verdict, Verdict::Inaccurate);
        assert_eq!(verdicts[1].justification, "Refuted by every physics text.");
    }

    #[test]
    fn test_parse_analysis_bare_array_and_repeats() {
        let claims = claims();
        let response = r#"[
            {"claim": 1, "verdict": "Accurate", "justification": "first"},
            {"claim": 1, "verdict": "Mixed", "justification": "second"}
        ]"#;

        let verdicts = parse_analysis_response(response, &claims).unwrap();

        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].justification, "first");
    }

    #[test]
    fn test_parse_analysis_rejects_bad_entries() {
        let claims = claims();
        let out_of_range = r#"{"verdicts": [{"claim": 3, "verdict": "Accurate", "justification": "x"}]}"#;
        let zero = r#"{"verdicts": [{"claim": 0, "verdict": "Accurate", "justification": "x"}]}"#;
        let unknown = r#"{"verdicts": [{"claim": 1, "verdict": "Plausible", "justification": "x"}]}"#;
        let silent = r#"{"verdicts": [{"claim": 1, "verdict": "Accurate"}]}"#;
        let shapeless = r#"{"report": "all good"}"#;

        for response in [out_of_range, zero, unknown, silent, shapeless] {
            assert!(
                matches!(parse_analysis_response(response, &claims), Err(EvaluatorError::InvalidFormat(_))),
                "accepted {}",
                response
            );
        }
    }

    #[test]
    fn test_extract_json_unterminated_fence() {
        let result = extract_json("```json\n{\"a\": 1}").unwrap();
        assert_eq!(result, "{\"a\": 1}");
    }
}
