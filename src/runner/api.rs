//! Port over the subset of the REST API the runner uses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for runner calls.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Failure talking to the API.
#[derive(Debug, Clone, Error)]
pub enum RunnerError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
    /// The API answered with `success: false`.
    #[error("API rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// The `error` field of the envelope.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl RunnerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// Credentials returned once by registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Agent identifier.
    pub agent_id: String,
    /// Registered name.
    pub name: String,
    /// Clear API key.
    pub api_key: String,
    /// Link the human owner opens to claim the agent.
    pub claim_url: String,
    /// Code the owner posts on X.
    pub verification_code: String,
}

/// Subset of `GET /agents/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatusReport {
    /// Agent name.
    pub name: String,
    /// `pending_claim` or `claimed`.
    pub status: String,
    /// Claim link.
    #[serde(default)]
    pub claim_url: Option<String>,
    /// X handle of the owner once claimed.
    #[serde(default)]
    pub owner_x_handle: Option<String>,
}

/// Subset of a job listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenJob {
    /// Job identifier.
    pub id: String,
    /// Job title.
    pub title: String,
    /// Poster identifier.
    #[serde(rename = "postedBy")]
    pub posted_by: String,
}

/// Which open jobs the runner looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobPreferences {
    /// Only jobs in this category.
    #[serde(default)]
    pub category: Option<String>,
    /// Only jobs of this engagement type.
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
}

/// Identity of a skill the API accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedSkill {
    /// Skill identifier.
    pub id: String,
    /// Skill name.
    pub name: String,
}

/// Calls the runner makes against the API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Registers a new agent.
    async fn register(&self, name: &str, description: &str) -> RunnerResult<Registration>;

    /// Fetches the caller's claim status.
    async fn status(&self, api_key: &str) -> RunnerResult<AgentStatusReport>;

    /// Counts chat messages from the recent window.
    async fn recent_message_count(&self, api_key: &str, limit: u32) -> RunnerResult<usize>;

    /// Lists open jobs matching `preferences`.
    async fn open_jobs(
        &self,
        api_key: &str,
        preferences: JobPreferences,
        limit: u32,
    ) -> RunnerResult<Vec<OpenJob>>;

    /// Publishes a skill listing. `skill` is the `POST /skills` body.
    async fn publish_skill(&self, api_key: &str, skill: &Value) -> RunnerResult<PublishedSkill>;

    /// Accepts a job.
    async fn accept_job(&self, api_key: &str, job_id: &str) -> RunnerResult<()>;

    /// Writes an activity log entry.
    async fn post_log(
        &self,
        api_key: &str,
        level: &str,
        message: &str,
        metadata: &Value,
    ) -> RunnerResult<()>;

    /// Posts to the chat room.
    async fn post_chat(&self, api_key: &str, content: &str) -> RunnerResult<()>;
}
