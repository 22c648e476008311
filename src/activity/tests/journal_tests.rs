//! Unit tests for activity log validation and the journal service.

use std::sync::Arc;

use crate::activity::{
    adapters::memory::InMemoryActivityLog,
    domain::{ActivityDomainError, LogEntry, LogFilter, LogLevel},
    services::{ActivityJournal, ActivityServiceError, NewLogEntry},
};
use crate::agent::domain::{Agent, AgentCredentials, AgentName, AgentProfile};
use crate::pagination::PageRequest;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestJournal = ActivityJournal<InMemoryActivityLog, DefaultClock>;

#[fixture]
fn journal() -> TestJournal {
    ActivityJournal::new(Arc::new(InMemoryActivityLog::new()), Arc::new(DefaultClock))
}

fn author(name: &str) -> Agent {
    let (_, credentials) = AgentCredentials::issue();
    Agent::register(
        AgentName::new(name).expect("valid name"),
        AgentProfile::new(),
        credentials,
        &DefaultClock,
    )
}

fn entry(level: LogLevel, message: &str) -> NewLogEntry {
    NewLogEntry {
        level,
        message: message.to_owned(),
        metadata: None,
    }
}

#[rstest]
#[case("", ActivityDomainError::InvalidMessage)]
#[case("   ", ActivityDomainError::InvalidMessage)]
fn blank_messages_are_rejected(#[case] message: &str, #[case] expected: ActivityDomainError) {
    let result = LogEntry::new(LogLevel::Info, message, "system", None, None, &DefaultClock);
    assert_eq!(result, Err(expected));
}

#[rstest]
fn oversized_metadata_is_rejected() {
    let result = LogEntry::new(
        LogLevel::Info,
        "hello",
        "system",
        None,
        Some("x".repeat(2001)),
        &DefaultClock,
    );
    assert_eq!(result, Err(ActivityDomainError::MetadataTooLong));
}

#[rstest]
#[case("DEBUG", LogLevel::Debug)]
#[case("warn", LogLevel::Warn)]
#[case(" Error ", LogLevel::Error)]
fn levels_parse_case_insensitively(#[case] input: &str, #[case] expected: LogLevel) {
    assert_eq!(LogLevel::try_from(input), Ok(expected));
}

#[rstest]
fn unknown_levels_are_rejected() {
    assert!(LogLevel::try_from("fatal").is_err());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_stamps_author_as_source(journal: TestJournal) {
    let agent = author("logger_bot");
    let written = journal
        .record(&agent, entry(LogLevel::Warn, "disk nearly full"))
        .await
        .expect("record should succeed");

    assert_eq!(written.source(), "logger_bot");
    assert_eq!(written.agent_id(), Some(agent.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_rejects_overlong_message(journal: TestJournal) {
    let agent = author("logger_bot");
    let result = journal
        .record(&agent, entry(LogLevel::Info, &"m".repeat(1001)))
        .await;
    assert!(matches!(
        result,
        Err(ActivityServiceError::Domain(ActivityDomainError::InvalidMessage))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_level_and_source(journal: TestJournal) {
    let alpha = author("alpha_bot");
    let beta = author("beta_bot");
    for (agent, level) in [
        (&alpha, LogLevel::Info),
        (&alpha, LogLevel::Error),
        (&beta, LogLevel::Error),
    ] {
        journal
            .record(agent, entry(level, "event"))
            .await
            .expect("record should succeed");
    }

    let filter = LogFilter {
        level: Some(LogLevel::Error),
        source: Some("ALPHA".to_owned()),
        agent_id: None,
    };
    let page = journal
        .list(&filter, PageRequest::default())
        .await
        .expect("list should succeed");

    assert_eq!(page.total, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_count_levels_and_errors(journal: TestJournal) {
    let agent = author("stats_bot");
    for level in [LogLevel::Info, LogLevel::Info, LogLevel::Error] {
        journal
            .record(&agent, entry(level, "event"))
            .await
            .expect("record should succeed");
    }

    let stats = journal.stats().await.expect("stats should succeed");

    assert_eq!(stats.total, 3);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.last_24h, 3);
    assert_eq!(stats.levels.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recent_returns_oldest_first_after_instant(journal: TestJournal) {
    let agent = author("recent_bot");
    let first = journal
        .record(&agent, entry(LogLevel::Info, "first"))
        .await
        .expect("record should succeed");
    journal
        .record(&agent, entry(LogLevel::Info, "second"))
        .await
        .expect("record should succeed");

    let all = journal.recent(None, None).await.expect("recent should succeed");
    assert_eq!(all.first().map(LogEntry::message), Some("first"));

    let later = journal
        .recent(Some(first.created_at()), None)
        .await
        .expect("recent should succeed");
    assert!(later.iter().all(|e| e.created_at() > first.created_at()));
}
