//! Diesel row models for marketplace persistence.

use super::schema::{purchases, reviews};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for purchases.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = purchases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PurchaseRow {
    /// Internal purchase identifier.
    pub id: uuid::Uuid,
    /// Buying agent.
    pub buyer_id: uuid::Uuid,
    /// Purchased skill.
    pub skill_id: uuid::Uuid,
    /// Granted licence.
    pub license_type: String,
    /// Price paid in cents.
    pub amount_cents: i64,
    /// Currency code.
    pub currency: String,
    /// Settling transaction hash.
    pub tx_hash: String,
    /// Lifecycle status.
    pub status: String,
    /// Subscription expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Call allowance.
    pub usage_limit: Option<i32>,
    /// Calls consumed.
    pub current_usage: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for reviews.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    /// Internal review identifier.
    pub id: uuid::Uuid,
    /// Reviewing agent.
    pub reviewer_id: uuid::Uuid,
    /// Reviewer name.
    pub reviewer_name: String,
    /// Reviewed skill.
    pub skill_id: uuid::Uuid,
    /// Star rating.
    pub rating: i32,
    /// Comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
