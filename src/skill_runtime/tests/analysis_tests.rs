//! Tests for local text analysis and the remote fallback.

use crate::skill_runtime::{
    domain::{AnalysisSource, AnalysisText, InvalidAnalysisText, LocalAnalyzer, Sentiment},
    ports::{MockCompletionClient, OutboundError, RemoteAnalysis},
    services::TextAnalysisService,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn analyzer() -> LocalAnalyzer {
    LocalAnalyzer::new().expect("patterns compile")
}

fn text(body: &str) -> AnalysisText {
    AnalysisText::new(body).expect("valid text")
}

#[rstest]
#[case(3, 1, Sentiment::Positive)]
#[case(1, 2, Sentiment::Negative)]
#[case(2, 2, Sentiment::Mixed)]
#[case(3, 2, Sentiment::Mixed)]
#[case(0, 0, Sentiment::Neutral)]
fn counts_decide_sentiment(#[case] positive: u32, #[case] negative: u32, #[case] expected: Sentiment) {
    assert_eq!(Sentiment::from_counts(positive, negative), expected);
}

#[rstest]
fn keywords_match_whole_words_only(analyzer: LocalAnalyzer) {
    let result = analyzer.analyze(
        &text("Great results and a good win. Goodness is not counted."),
        AnalysisSource::Local,
    );
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.source, AnalysisSource::Local);
}

#[rstest]
fn negative_text_is_negative(analyzer: LocalAnalyzer) {
    let result = analyzer.analyze(
        &text("This was a terrible, awful problem."),
        AnalysisSource::Local,
    );
    assert_eq!(result.sentiment, Sentiment::Negative);
}

#[rstest]
fn entities_are_unique_capitalised_pairs(analyzer: LocalAnalyzer) {
    let result = analyzer.analyze(
        &text("Ada Lovelace met Charles Babbage, then Ada Lovelace wrote notes."),
        AnalysisSource::Local,
    );
    let names: Vec<&str> = result.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Charles Babbage"]);
    assert_eq!(result.entities.first().map(|e| e.relevance), Some(1.0));
    assert_eq!(result.entities.get(1).map(|e| e.relevance), Some(0.9));
    assert!(result.entities.iter().all(|e| e.entity_type == "OTHER"));
}

#[rstest]
fn summary_keeps_two_long_sentences(analyzer: LocalAnalyzer) {
    let result = analyzer.analyze(
        &text("The first sentence is long. Short. The second long sentence! A third long sentence?"),
        AnalysisSource::Local,
    );
    assert_eq!(
        result.summary,
        "The first sentence is long.  The second long sentence..."
    );
}

#[rstest]
fn summary_falls_back_to_prefix(analyzer: LocalAnalyzer) {
    let result = analyzer.analyze(&text("Tiny. Bits."), AnalysisSource::Local);
    assert_eq!(result.summary, "Tiny. Bits.");
}

#[rstest]
#[case("")]
#[case(&"x".repeat(50_001))]
fn text_length_is_bounded(#[case] body: &str) {
    assert_eq!(AnalysisText::new(body), Err(InvalidAnalysisText));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn without_backend_analysis_is_local(analyzer: LocalAnalyzer) {
    let service: TextAnalysisService<MockCompletionClient> = TextAnalysisService::new(None, analyzer);
    let result = service
        .analyze("I love this".to_owned())
        .await
        .expect("analysis succeeds");
    assert_eq!(result.source, AnalysisSource::Local);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backend_failure_falls_back(analyzer: LocalAnalyzer) {
    let mut remote = MockCompletionClient::new();
    remote
        .expect_analyze()
        .times(1)
        .returning(|_| Err(OutboundError::invalid_response("boom")));
    let service = TextAnalysisService::new(Some(Arc::new(remote)), analyzer);

    let result = service
        .analyze("I love this".to_owned())
        .await
        .expect("analysis succeeds");
    assert_eq!(result.source, AnalysisSource::LocalFallback);
    assert_eq!(result.sentiment, Sentiment::Positive);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backend_answer_fills_defaults(analyzer: LocalAnalyzer) {
    let mut remote = MockCompletionClient::new();
    remote.expect_analyze().returning(|_| {
        Ok(RemoteAnalysis {
            sentiment: Some("MIXED".to_owned()),
            ..RemoteAnalysis::default()
        })
    });
    let service = TextAnalysisService::new(Some(Arc::new(remote)), analyzer);

    let result = service
        .analyze("Quarterly numbers".to_owned())
        .await
        .expect("analysis succeeds");
    assert_eq!(result.source, AnalysisSource::Openai);
    assert_eq!(result.sentiment, Sentiment::Mixed);
    assert_eq!(result.summary, "Quarterly numbers...");
}
