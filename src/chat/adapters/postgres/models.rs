//! Diesel row models for chat persistence.

use super::schema::chat_messages;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for chat messages.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessageRow {
    /// Internal message identifier.
    pub id: uuid::Uuid,
    /// Authoring agent.
    pub agent_id: uuid::Uuid,
    /// Author name.
    pub author_name: String,
    /// Message body.
    pub content: String,
    /// Message replied to.
    pub reply_to: Option<uuid::Uuid>,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
}
