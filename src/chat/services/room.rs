//! Service layer for posting and reading chat messages.

use crate::activity::{ports::ActivityLogRepository, services::ActivityJournal};
use crate::agent::domain::Agent;
use crate::chat::{
    domain::{ChatDomainError, ChatMessage, ChatMessageId},
    ports::{ChatRepository, ChatRepositoryError},
};
use crate::pagination::PageRequest;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Messages returned by [`ChatRoomService::history`] when no limit is given.
pub const HISTORY_DEFAULT_LIMIT: u32 = 50;

/// Messages returned by [`ChatRoomService::recent`] when no limit is given.
pub const RECENT_DEFAULT_LIMIT: u32 = 20;

const PREVIEW_LENGTH: usize = 50;

/// Service-level errors for chat operations.
#[derive(Debug, Error)]
pub enum ChatServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ChatRepositoryError),
}

/// Result type for chat service operations.
pub type ChatServiceResult<T> = Result<T, ChatServiceError>;

/// Chat room orchestration service.
pub struct ChatRoomService<R, L, C>
where
    R: ChatRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    messages: Arc<R>,
    journal: ActivityJournal<L, C>,
    clock: Arc<C>,
}

impl<R, L, C> Clone for ChatRoomService<R, L, C>
where
    R: ChatRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            journal: self.journal.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, L, C> ChatRoomService<R, L, C>
where
    R: ChatRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new chat room service.
    #[must_use]
    pub const fn new(messages: Arc<R>, journal: ActivityJournal<L, C>, clock: Arc<C>) -> Self {
        Self {
            messages,
            journal,
            clock,
        }
    }

    /// Posts a message, optionally replying to an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Domain`] for invalid content or
    /// [`ChatRepositoryError::ReplyTargetMissing`] for an unknown reply
    /// target.
    pub async fn post(
        &self,
        author: &Agent,
        content: String,
        reply_to: Option<ChatMessageId>,
    ) -> ChatServiceResult<ChatMessage> {
        let message = ChatMessage::new(author, content, reply_to, &*self.clock)?;
        if let Some(target) = reply_to {
            if self.messages.find_by_id(target).await?.is_none() {
                return Err(ChatRepositoryError::ReplyTargetMissing(target).into());
            }
        }
        self.messages.append(&message).await?;

        let preview: String = message.content().chars().take(PREVIEW_LENGTH).collect();
        self.journal
            .note(
                author,
                format!("Chat: {}: {preview}", author.name()),
                &json!({ "messageId": message.id() }),
            )
            .await;
        Ok(message)
    }

    /// Returns the newest messages before `before`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] when lookup fails.
    pub async fn history(
        &self,
        before: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> ChatServiceResult<Vec<ChatMessage>> {
        let bounded = bounded_limit(limit, HISTORY_DEFAULT_LIMIT);
        Ok(self.messages.history(before, bounded).await?)
    }

    /// Returns messages posted after `after`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] when lookup fails.
    pub async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> ChatServiceResult<Vec<ChatMessage>> {
        let bounded = bounded_limit(limit, RECENT_DEFAULT_LIMIT);
        Ok(self.messages.recent(after, bounded).await?)
    }
}

fn bounded_limit(limit: Option<u32>, default_limit: u32) -> u32 {
    PageRequest::new(None, limit, default_limit, PageRequest::DEFAULT_MAX_LIMIT).limit()
}
