//! Integration tests for the Extractor

use crate::{ChunkStrategy, ExtractorConfig, ExtractorError, LlmClaimExtractor};
use verity_domain::traits::{ClaimExtractor, Document};
use verity_llm::MockProvider;

fn document(text: &str) -> Document {
    Document {
        text: text.to_string(),
        origin_domain: None,
    }
}

fn chunked_config() -> ExtractorConfig {
    ExtractorConfig {
        max_chunk_size: 40,
        chunk_strategy: ChunkStrategy::ByParagraph,
        ..Default::default()
    }
}

#[test]
fn test_full_extraction_flow() {
    let llm = MockProvider::new(
        r#"{"claims": [
            "The WHO declared COVID-19 a pandemic on March 11, 2020.",
            "Mars has two moons named Phobos and Deimos."
        ]}"#,
    );
    let extractor = LlmClaimExtractor::new(llm.clone(), ExtractorConfig::default());

    let claims = extractor.extract(&document("Some article text.")).unwrap();

    assert_eq!(claims.len(), 2);
    assert_ne!(claims[0].id, claims[1].id);
    assert!(!claims[0].origin_source_excluded);
    assert_eq!(llm.call_count(), 1);
}

#[test]
fn test_claim_cap() {
    let llm = MockProvider::new(
        r#"["Claim number one.", "Claim number two.", "Claim number three.", "Claim number four."]"#,
    );
    let config = ExtractorConfig {
        max_claims: 2,
        ..Default::default()
    };
    let extractor = LlmClaimExtractor::new(llm, config);

    let result = extractor.extract_blocking(&document("text")).unwrap();

    assert_eq!(result.claims.len(), 2);
    assert_eq!(result.claims[1].text, "Claim number two.");
    assert_eq!(result.metadata.truncated, 2);
}

#[test]
fn test_origin_exclusion_applied() {
    let llm = MockProvider::new(r#"{"claims": ["Unemployment fell to 3.5 percent."]}"#);
    let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());

    let doc = Document {
        text: "Article body".to_string(),
        origin_domain: Some("www.Daily-News.example".to_string()),
    };
    let claims = extractor.extract(&doc).unwrap();

    assert!(claims[0].origin_source_excluded);
    assert!(claims[0].excludes_domain("daily-news.example"));
    assert!(!claims[0].excludes_domain("reuters.com"));
}

#[test]
fn test_origin_exclusion_disabled() {
    let llm = MockProvider::new(r#"{"claims": ["Unemployment fell to 3.5 percent."]}"#);
    let config = ExtractorConfig {
        exclude_origin: false,
        ..Default::default()
    };
    let extractor = LlmClaimExtractor::new(llm, config);

    let doc = Document {
        text: "Article body".to_string(),
        origin_domain: Some("daily-news.example".to_string()),
    };
    let claims = extractor.extract(&doc).unwrap();

    assert!(!claims[0].origin_source_excluded);
}

#[test]
fn test_chunks_are_deduplicated() {
    let llm = MockProvider::default();
    llm.push_response(r#"{"claims": ["Mars has two moons.", "Mars is red."]}"#);
    llm.push_response(r#"{"claims": ["mars has two moons", "Phobos is the larger moon."]}"#);
    let extractor = LlmClaimExtractor::new(llm.clone(), chunked_config());

    let text = "Mars has two moons, Phobos and Deimos.\n\nPhobos is the larger of the two moons.";
    let result = extractor.extract_blocking(&document(text)).unwrap();

    assert_eq!(llm.call_count(), 2);
    assert!(llm.prompts()[1].contains("part 2 of 2"));
    assert_eq!(result.metadata.chunks_processed, 2);
    assert_eq!(result.metadata.candidates_seen, 4);
    assert_eq!(result.metadata.duplicates_dropped, 1);
    let texts: Vec<_> = result.claims.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Mars has two moons.", "Mars is red.", "Phobos is the larger moon."]);
}

#[test]
fn test_failed_chunk_does_not_sink_document() {
    let llm = MockProvider::default();
    llm.push_response("ERROR");
    llm.push_response(r#"{"claims": ["Phobos is the larger moon."]}"#);
    let extractor = LlmClaimExtractor::new(llm, chunked_config());

    let text = "Mars has two moons, Phobos and Deimos.\n\nPhobos is the larger of the two moons.";
    let result = extractor.extract_blocking(&document(text)).unwrap();

    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].chunk_index, 0);
    assert!(!result.all_failed());
}

#[test]
fn test_every_chunk_failing_is_an_error() {
    let llm = MockProvider::new("not json at all");
    let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());

    let result = extractor.extract(&document("Article"));
    assert!(matches!(result, Err(ExtractorError::AllChunksFailed { chunks: 1, .. })));
}

#[test]
fn test_no_claims_is_not_an_error() {
    let llm = MockProvider::new(r#"{"claims": []}"#);
    let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());

    let claims = extractor.extract(&document("Opinion piece with no facts.")).unwrap();
    assert!(claims.is_empty());
}

#[test]
fn test_text_too_long() {
    let llm = MockProvider::new("[]");
    let extractor = LlmClaimExtractor::new(llm.clone(), ExtractorConfig::default());

    let result = extractor.extract(&document(&"a".repeat(100_000)));
    assert!(matches!(result, Err(ExtractorError::TextTooLong(100_000, 50_000))));
    assert_eq!(llm.call_count(), 0);
}

#[test]
fn test_empty_document() {
    let extractor = LlmClaimExtractor::new(MockProvider::new("[]"), ExtractorConfig::default());
    assert!(matches!(
        extractor.extract(&document("  \n ")),
        Err(ExtractorError::EmptyDocument)
    ));
}

#[tokio::test]
async fn test_async_extraction() {
    let llm = MockProvider::new(r#"{"claims": ["The Eiffel Tower is in Paris."]}"#);
    let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());

    let result = extractor
        .extract_document(&document("The Eiffel Tower stands in Paris."))
        .await
        .unwrap();

    assert_eq!(result.claims.len(), 1);
    assert!(result.failures.is_empty());
}

#[tokio::test]
async fn test_async_extraction_records_llm_failure() {
    let llm = MockProvider::default();
    llm.add_error_containing("Eiffel");
    let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());

    let result = extractor
        .extract_document(&document("The Eiffel Tower stands in Paris."))
        .await
        .unwrap();

    assert!(result.claims.is_empty());
    assert!(result.all_failed());
    assert!(result.failures[0].reason.contains("LLM error"));
}
