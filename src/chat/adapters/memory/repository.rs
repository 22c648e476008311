//! In-memory chat log, used by tests and demo mode.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::chat::{
    domain::{ChatMessage, ChatMessageId},
    ports::{ChatRepository, ChatRepositoryError, ChatRepositoryResult},
};

/// Thread-safe in-memory chat repository.
///
/// Messages are kept in posting order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
}

impl InMemoryChatRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ChatRepositoryError {
    ChatRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn take_count(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn append(&self, message: &ChatMessage) -> ChatRepositoryResult<()> {
        let mut messages = self.messages.write().map_err(lock_error)?;
        if let Some(target) = message.reply_to() {
            if !messages.iter().any(|existing| existing.id() == target) {
                return Err(ChatRepositoryError::ReplyTargetMissing(target));
            }
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ChatMessageId) -> ChatRepositoryResult<Option<ChatMessage>> {
        let messages = self.messages.read().map_err(lock_error)?;
        Ok(messages.iter().find(|message| message.id() == id).cloned())
    }

    async fn history(
        &self,
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ChatRepositoryResult<Vec<ChatMessage>> {
        let messages = self.messages.read().map_err(lock_error)?;
        let mut newest: Vec<ChatMessage> = messages
            .iter()
            .rev()
            .filter(|message| before.is_none_or(|cutoff| message.created_at() < cutoff))
            .take(take_count(limit))
            .cloned()
            .collect();
        newest.reverse();
        Ok(newest)
    }

    async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ChatRepositoryResult<Vec<ChatMessage>> {
        let messages = self.messages.read().map_err(lock_error)?;
        Ok(messages
            .iter()
            .filter(|message| after.is_none_or(|cutoff| message.created_at() > cutoff))
            .take(take_count(limit))
            .cloned()
            .collect())
    }
}
