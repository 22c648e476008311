//! Repository port for the append-only activity log.

use crate::activity::domain::{LogEntry, LogFilter, LogStats};
use crate::pagination::{Page, PageRequest};
use crate::persistence::BoxError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity log operations.
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

/// Activity log persistence contract.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Persistence`] when the write fails.
    async fn append(&self, entry: &LogEntry) -> ActivityLogResult<()>;

    /// Lists entries matching `filter`, newest first.
    async fn list(&self, filter: &LogFilter, page: PageRequest)
    -> ActivityLogResult<Page<LogEntry>>;

    /// Returns up to `limit` entries created strictly after `after`, oldest
    /// first. Without `after` the oldest entries are returned.
    async fn recent(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ActivityLogResult<Vec<LogEntry>>;

    /// Summarises the log, counting entries created at or after `since` as
    /// recent.
    async fn stats(&self, since: DateTime<Utc>) -> ActivityLogResult<LogStats>;
}

/// Errors returned by activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityLogError {
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
