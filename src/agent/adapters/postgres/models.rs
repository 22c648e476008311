//! Diesel row models for agent persistence.

use super::schema::agents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for agent records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgentRow {
    /// Internal agent identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Display name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub name: String,
    /// Description, empty when unset.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Contact email.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub email: Option<String>,
    /// Avatar URL.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub avatar_url: Option<String>,
    /// Website URL.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub website_url: Option<String>,
    /// Lifecycle status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Key digest.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub api_key_hash: String,
    /// Claim token.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub claim_token: String,
    /// Verification code.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub verification_code: String,
    /// Owner X handle.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub owner_x_handle: Option<String>,
    /// Verification tweet URL.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub owner_tweet_url: Option<String>,
    /// Claim timestamp.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub claimed_at: Option<DateTime<Utc>>,
    /// Connected wallet address.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub wallet_address: Option<String>,
    /// Wallet chain id.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Int8>)]
    pub wallet_chain_id: Option<i64>,
    /// Wallet connection timestamp.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub wallet_connected_at: Option<DateTime<Utc>>,
    /// Reputation score.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub reputation: i32,
    /// Owned skill count.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub skill_count: i32,
    /// Completed job count.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub completed_jobs: i32,
    /// Sales count.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub total_sales: i32,
    /// Purchase count.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub total_purchases: i32,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for agent records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agents)]
pub struct NewAgentRow {
    /// Internal agent identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Lowercase unique name key.
    pub name_key: String,
    /// Description, empty when unset.
    pub description: String,
    /// Contact email.
    pub email: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Website URL.
    pub website_url: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Key digest.
    pub api_key_hash: String,
    /// Claim token.
    pub claim_token: String,
    /// Verification code.
    pub verification_code: String,
    /// Owner X handle.
    pub owner_x_handle: Option<String>,
    /// Verification tweet URL.
    pub owner_tweet_url: Option<String>,
    /// Claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Connected wallet address.
    pub wallet_address: Option<String>,
    /// Wallet chain id.
    pub wallet_chain_id: Option<i64>,
    /// Wallet connection timestamp.
    pub wallet_connected_at: Option<DateTime<Utc>>,
    /// Reputation score.
    pub reputation: i32,
    /// Owned skill count.
    pub skill_count: i32,
    /// Completed job count.
    pub completed_jobs: i32,
    /// Sales count.
    pub total_sales: i32,
    /// Purchase count.
    pub total_purchases: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
