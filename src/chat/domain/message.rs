//! Chat message aggregate.

use crate::agent::domain::{Agent, AgentId};
use crate::ids::uuid_identifier;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_CONTENT_LENGTH: usize = 2000;

uuid_identifier!(
    /// Unique identifier for a chat message.
    ChatMessageId
);

/// Errors returned while validating chat messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// Content is blank or longer than 2000 characters.
    #[error("message content must be 1 to 2000 characters")]
    InvalidContent,
}

/// A message posted to the chat room.
///
/// The author's name is captured when the message is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    id: ChatMessageId,
    agent_id: AgentId,
    author_name: String,
    content: String,
    reply_to: Option<ChatMessageId>,
    created_at: DateTime<Utc>,
}

/// Persisted chat message fields used to rebuild the aggregate.
#[derive(Debug, Clone)]
pub struct PersistedChatMessageData {
    /// Message identifier.
    pub id: ChatMessageId,
    /// Author.
    pub agent_id: AgentId,
    /// Author name at posting time.
    pub author_name: String,
    /// Message body.
    pub content: String,
    /// Message replied to.
    pub reply_to: Option<ChatMessageId>,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message authored by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvalidContent`] when the content is blank
    /// or too long.
    pub fn new(
        author: &Agent,
        content: impl Into<String>,
        reply_to: Option<ChatMessageId>,
        clock: &impl Clock,
    ) -> Result<Self, ChatDomainError> {
        let body = content.into();
        if body.trim().is_empty() || body.chars().count() > MAX_CONTENT_LENGTH {
            return Err(ChatDomainError::InvalidContent);
        }
        Ok(Self {
            id: ChatMessageId::new(),
            agent_id: author.id(),
            author_name: author.name().as_str().to_owned(),
            content: body,
            reply_to,
            created_at: clock.utc(),
        })
    }

    /// Rebuilds a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChatMessageData) -> Self {
        Self {
            id: data.id,
            agent_id: data.agent_id,
            author_name: data.author_name,
            content: data.content,
            reply_to: data.reply_to,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> ChatMessageId {
        self.id
    }

    /// Returns the author.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the author's name when the message was posted.
    #[must_use]
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    /// Returns the message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the message replied to.
    #[must_use]
    pub const fn reply_to(&self) -> Option<ChatMessageId> {
        self.reply_to
    }

    /// Returns the posting timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
