//! Service layer for writing and reading the activity log.

use crate::activity::{
    domain::{ActivityDomainError, LogEntry, LogFilter, LogLevel, LogStats},
    ports::{ActivityLogError, ActivityLogRepository},
};
use crate::agent::domain::Agent;
use crate::pagination::{Page, PageRequest};
use chrono::{Duration, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Default number of entries returned by [`ActivityJournal::recent`].
pub const RECENT_DEFAULT_LIMIT: u32 = 50;

/// Entry submitted by an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLogEntry {
    /// Severity; defaults to [`LogLevel::Info`].
    pub level: LogLevel,
    /// Message text.
    pub message: String,
    /// Optional metadata string.
    pub metadata: Option<String>,
}

/// Service-level errors for activity log operations.
#[derive(Debug, Error)]
pub enum ActivityServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ActivityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ActivityLogError),
}

/// Result type for activity log service operations.
pub type ActivityServiceResult<T> = Result<T, ActivityServiceError>;

/// Activity log orchestration service.
pub struct ActivityJournal<R, C>
where
    R: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for ActivityJournal<R, C>
where
    R: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> ActivityJournal<R, C>
where
    R: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new journal.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Writes an entry authored by `author`, using its name as the source.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::Domain`] when validation fails or
    /// [`ActivityServiceError::Repository`] when the write fails.
    pub async fn record(
        &self,
        author: &Agent,
        entry: NewLogEntry,
    ) -> ActivityServiceResult<LogEntry> {
        let NewLogEntry {
            level,
            message,
            metadata,
        } = entry;
        let log_entry = LogEntry::new(
            level,
            message,
            author.name().as_str(),
            Some(author.id()),
            metadata,
            &*self.clock,
        )?;
        self.repository.append(&log_entry).await?;
        Ok(log_entry)
    }

    /// Writes an informational entry on behalf of another service.
    ///
    /// Failures are reported through `tracing` and otherwise ignored so the
    /// triggering operation still succeeds.
    pub async fn note(&self, author: &Agent, message: String, metadata: &serde_json::Value) {
        let entry = NewLogEntry {
            level: LogLevel::Info,
            message,
            metadata: Some(metadata.to_string()),
        };
        if let Err(err) = self.record(author, entry).await {
            tracing::warn!(agent_id = %author.id(), error = %err, "failed to write activity log");
        }
    }

    /// Lists entries matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::Repository`] when lookup fails.
    pub async fn list(
        &self,
        filter: &LogFilter,
        page: PageRequest,
    ) -> ActivityServiceResult<Page<LogEntry>> {
        Ok(self.repository.list(filter, page).await?)
    }

    /// Returns entries newer than `after`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::Repository`] when lookup fails.
    pub async fn recent(
        &self,
        after: Option<chrono::DateTime<Utc>>,
        limit: Option<u32>,
    ) -> ActivityServiceResult<Vec<LogEntry>> {
        let capped = limit
            .filter(|value| *value > 0)
            .unwrap_or(RECENT_DEFAULT_LIMIT)
            .min(PageRequest::DEFAULT_MAX_LIMIT);
        Ok(self.repository.recent(after, capped).await?)
    }

    /// Summarises the log for dashboards.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityServiceError::Repository`] when lookup fails.
    pub async fn stats(&self) -> ActivityServiceResult<LogStats> {
        let since = self.clock.utc() - Duration::hours(24);
        Ok(self.repository.stats(since).await?)
    }
}
