//! Diesel row models for activity log persistence.

use super::schema::activity_logs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for activity log entries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = activity_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LogEntryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Severity level.
    pub level: String,
    /// Log message.
    pub message: String,
    /// Source label.
    pub source: String,
    /// Authoring agent.
    pub agent_id: Option<uuid::Uuid>,
    /// Metadata string.
    pub metadata: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
