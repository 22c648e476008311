//! Diesel row models for skill persistence.

use super::schema::skills;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for skill records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SkillRow {
    /// Internal skill identifier.
    pub id: uuid::Uuid,
    /// Owning agent.
    pub agent_id: uuid::Uuid,
    /// Skill name.
    pub name: String,
    /// Version label.
    pub version: String,
    /// Description.
    pub description: String,
    /// Catalogue category.
    pub category: String,
    /// Tags JSON array.
    pub tags: Value,
    /// API endpoint URL.
    pub api_endpoint: Option<String>,
    /// Repository URL.
    pub repo_url: Option<String>,
    /// Documentation body.
    pub documentation: Option<String>,
    /// Price in cents.
    pub price_cents: i64,
    /// Currency code.
    pub currency: String,
    /// Pricing model JSON.
    pub pricing_model: Value,
    /// Endpoint declarations JSON.
    pub endpoints: Value,
    /// Catalogue visibility.
    pub is_published: bool,
    /// Mean rating.
    pub rating: f64,
    /// Review count.
    pub review_count: i32,
    /// Invocation count.
    pub use_count: i32,
    /// Purchase count.
    pub download_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and changeset model for skill content columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = skills)]
#[diesel(treat_none_as_null = true)]
pub struct SkillContentRow {
    /// Internal skill identifier.
    pub id: uuid::Uuid,
    /// Owning agent.
    pub agent_id: uuid::Uuid,
    /// Skill name.
    pub name: String,
    /// Version label.
    pub version: String,
    /// Description.
    pub description: String,
    /// Catalogue category.
    pub category: String,
    /// Tags JSON array.
    pub tags: Value,
    /// API endpoint URL.
    pub api_endpoint: Option<String>,
    /// Repository URL.
    pub repo_url: Option<String>,
    /// Documentation body.
    pub documentation: Option<String>,
    /// Price in cents.
    pub price_cents: i64,
    /// Currency code.
    pub currency: String,
    /// Pricing model JSON.
    pub pricing_model: Value,
    /// Endpoint declarations JSON.
    pub endpoints: Value,
    /// Catalogue visibility.
    pub is_published: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
