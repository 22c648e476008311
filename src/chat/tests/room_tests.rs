//! Unit tests for chat posting and reading.

use std::sync::Arc;

use crate::activity::{adapters::memory::InMemoryActivityLog, services::ActivityJournal};
use crate::agent::domain::{Agent, AgentCredentials, AgentName, AgentProfile};
use crate::chat::{
    adapters::memory::InMemoryChatRepository,
    domain::{ChatDomainError, ChatMessageId},
    ports::ChatRepositoryError,
    services::{ChatRoomService, ChatServiceError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestRoom = ChatRoomService<InMemoryChatRepository, InMemoryActivityLog, DefaultClock>;

#[fixture]
fn room() -> TestRoom {
    let clock = Arc::new(DefaultClock);
    ChatRoomService::new(
        Arc::new(InMemoryChatRepository::new()),
        ActivityJournal::new(Arc::new(InMemoryActivityLog::new()), Arc::clone(&clock)),
        clock,
    )
}

#[fixture]
fn author() -> Agent {
    let (_, credentials) = AgentCredentials::issue();
    Agent::register(
        AgentName::new("chatty_bot").expect("valid name"),
        AgentProfile::new(),
        credentials,
        &DefaultClock,
    )
}

#[rstest]
#[case(String::new())]
#[case("  ".to_owned())]
#[case("x".repeat(2001))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_content_is_rejected(room: TestRoom, author: Agent, #[case] content: String) {
    let result = room.post(&author, content, None).await;
    assert!(matches!(
        result,
        Err(ChatServiceError::Domain(ChatDomainError::InvalidContent))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replies_must_target_existing_messages(room: TestRoom, author: Agent) {
    let missing = ChatMessageId::new();
    let result = room.post(&author, "hello".to_owned(), Some(missing)).await;
    assert!(matches!(
        result,
        Err(ChatServiceError::Repository(
            ChatRepositoryError::ReplyTargetMissing(id)
        )) if id == missing
    ));

    let first = room
        .post(&author, "hello".to_owned(), None)
        .await
        .expect("post should succeed");
    let reply = room
        .post(&author, "hi back".to_owned(), Some(first.id()))
        .await
        .expect("reply should succeed");
    assert_eq!(reply.reply_to(), Some(first.id()));
    assert_eq!(reply.author_name(), "chatty_bot");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_returns_newest_messages_oldest_first(room: TestRoom, author: Agent) {
    for text in ["one", "two", "three"] {
        room.post(&author, text.to_owned(), None)
            .await
            .expect("post should succeed");
    }

    let history = room
        .history(None, Some(2))
        .await
        .expect("history should load");

    let contents: Vec<&str> = history.iter().map(|message| message.content()).collect();
    assert_eq!(contents, ["two", "three"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recent_returns_messages_after_cutoff(room: TestRoom, author: Agent) {
    let first = room
        .post(&author, "one".to_owned(), None)
        .await
        .expect("post should succeed");
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    room.post(&author, "two".to_owned(), None)
        .await
        .expect("post should succeed");

    let recent = room
        .recent(Some(first.created_at()), None)
        .await
        .expect("recent should load");

    let contents: Vec<&str> = recent.iter().map(|message| message.content()).collect();
    assert_eq!(contents, ["two"]);
}
