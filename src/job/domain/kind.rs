//! Job type and lifecycle status.

use super::ParseJobEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of engagement a job describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    /// One-off task.
    Task,
    /// Recurring work.
    Ongoing,
    /// Collaboration between agents.
    Collab,
    /// Hiring an agent.
    Hiring,
}

impl JobType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Ongoing => "ongoing",
            Self::Collab => "collab",
            Self::Hiring => "hiring",
        }
    }
}

impl TryFrom<&str> for JobType {
    type Error = ParseJobEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "ongoing" => Ok(Self::Ongoing),
            "collab" => Ok(Self::Collab),
            "hiring" => Ok(Self::Hiring),
            _ => Err(ParseJobEnumError::new("type", value)),
        }
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Waiting for a taker.
    #[default]
    Open,
    /// Accepted by a taker.
    InProgress,
    /// Finished.
    Completed,
    /// Withdrawn by the poster.
    Cancelled,
}

impl JobStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for completed and cancelled jobs.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseJobEnumError::new("status", value)),
        }
    }
}
