//! Activity log entry and query types.

use super::{ActivityDomainError, LogEntryId, LogLevel};
use crate::agent::domain::AgentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_MESSAGE_LENGTH: usize = 1000;
const MAX_METADATA_LENGTH: usize = 2000;

/// One immutable activity log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    id: LogEntryId,
    level: LogLevel,
    message: String,
    source: String,
    agent_id: Option<AgentId>,
    metadata: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLogEntryData {
    /// Persisted identifier.
    pub id: LogEntryId,
    /// Persisted level.
    pub level: LogLevel,
    /// Persisted message.
    pub message: String,
    /// Persisted source label.
    pub source: String,
    /// Persisted author.
    pub agent_id: Option<AgentId>,
    /// Persisted metadata.
    pub metadata: Option<String>,
    /// Persisted timestamp.
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// Creates a validated entry stamped with the current time.
    ///
    /// `metadata` is an opaque string, conventionally JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError`] when the message, source or metadata
    /// break their length rules.
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        source: impl Into<String>,
        agent_id: Option<AgentId>,
        metadata: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ActivityDomainError> {
        let text = message.into();
        let length = text.trim().chars().count();
        if length == 0 || length > MAX_MESSAGE_LENGTH {
            return Err(ActivityDomainError::InvalidMessage);
        }
        let label = source.into();
        if label.trim().is_empty() {
            return Err(ActivityDomainError::EmptySource);
        }
        if metadata
            .as_ref()
            .is_some_and(|value| value.chars().count() > MAX_METADATA_LENGTH)
        {
            return Err(ActivityDomainError::MetadataTooLong);
        }
        Ok(Self {
            id: LogEntryId::new(),
            level,
            message: text,
            source: label,
            agent_id,
            metadata,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLogEntryData) -> Self {
        Self {
            id: data.id,
            level: data.level,
            message: data.message,
            source: data.source,
            agent_id: data.agent_id,
            metadata: data.metadata,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> LogEntryId {
        self.id
    }

    /// Returns the severity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source label, usually the author's name.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the authoring agent, if any.
    #[must_use]
    pub const fn agent_id(&self) -> Option<AgentId> {
        self.agent_id
    }

    /// Returns the metadata string.
    #[must_use]
    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when the entry passes `filter`.
    #[must_use]
    pub fn matches(&self, filter: &LogFilter) -> bool {
        filter.level.is_none_or(|level| level == self.level)
            && filter.agent_id.is_none_or(|id| Some(id) == self.agent_id)
            && filter.source.as_deref().is_none_or(|needle| {
                self.source
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }
}

/// Query filter for log listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact level.
    pub level: Option<LogLevel>,
    /// Case-insensitive substring of the source label.
    pub source: Option<String>,
    /// Exact author.
    pub agent_id: Option<AgentId>,
}

/// Number of entries at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    /// Level being counted.
    pub level: LogLevel,
    /// Number of entries.
    pub count: u64,
}

/// Dashboard summary of the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    /// All entries.
    pub total: u64,
    /// Entries at [`LogLevel::Error`].
    pub errors: u64,
    /// Entries written in the last 24 hours.
    pub last_24h: u64,
    /// Per-level counts for levels with at least one entry.
    pub levels: Vec<LevelCount>,
}
