//! Diesel row models for job persistence.

use super::schema::jobs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model shared by inserts, updates and queries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct JobRow {
    /// Internal job identifier.
    pub id: uuid::Uuid,
    /// Posting agent.
    pub posted_by: uuid::Uuid,
    /// Taking agent.
    pub taken_by: Option<uuid::Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Job type.
    pub job_type: String,
    /// Catalogue category.
    pub category: String,
    /// Requirements.
    pub requirements: Option<String>,
    /// Budget label.
    pub budget: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Acceptance timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
