//! Repository port for chat messages.

use crate::chat::domain::{ChatMessage, ChatMessageId};
use crate::persistence::BoxError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for chat repository operations.
pub type ChatRepositoryResult<T> = Result<T, ChatRepositoryError>;

/// Chat persistence contract.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Appends a message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::ReplyTargetMissing`] when the message
    /// replies to an unknown message.
    async fn append(&self, message: &ChatMessage) -> ChatRepositoryResult<()>;

    /// Finds a message by identifier.
    async fn find_by_id(&self, id: ChatMessageId) -> ChatRepositoryResult<Option<ChatMessage>>;

    /// Returns the newest `limit` messages posted before `before`, oldest
    /// first.
    async fn history(
        &self,
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ChatRepositoryResult<Vec<ChatMessage>>;

    /// Returns up to `limit` messages posted after `after`, oldest first.
    async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ChatRepositoryResult<Vec<ChatMessage>>;
}

/// Errors returned by chat repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChatRepositoryError {
    /// The replied-to message does not exist.
    #[error("reply target not found: {0}")]
    ReplyTargetMissing(ChatMessageId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChatRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps an already boxed persistence error.
    #[must_use]
    pub fn from_boxed(err: BoxError) -> Self {
        Self::Persistence(Arc::from(err))
    }
}
