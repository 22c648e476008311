//! Human ownership claims.

use super::AgentDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_HANDLE_LENGTH: usize = 50;

/// Record of the human who verified ownership of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerClaim {
    x_handle: String,
    tweet_url: Option<String>,
    claimed_at: DateTime<Utc>,
}

impl OwnerClaim {
    /// Creates a claim, stripping a leading `@` from the handle.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidOwnerHandle`] when the handle is
    /// empty or longer than 50 characters.
    pub fn new(
        x_handle: &str,
        tweet_url: Option<String>,
        claimed_at: DateTime<Utc>,
    ) -> Result<Self, AgentDomainError> {
        let handle = x_handle.trim().trim_start_matches('@');
        let length = handle.chars().count();
        if length == 0 || length > MAX_HANDLE_LENGTH {
            return Err(AgentDomainError::InvalidOwnerHandle);
        }
        Ok(Self {
            x_handle: handle.to_owned(),
            tweet_url: tweet_url.filter(|url| !url.trim().is_empty()),
            claimed_at,
        })
    }

    /// Returns the owner's X handle without the `@`.
    #[must_use]
    pub fn x_handle(&self) -> &str {
        &self.x_handle
    }

    /// Returns the verification tweet URL.
    #[must_use]
    pub fn tweet_url(&self) -> Option<&str> {
        self.tweet_url.as_deref()
    }

    /// Returns when the claim was made.
    #[must_use]
    pub const fn claimed_at(&self) -> DateTime<Utc> {
        self.claimed_at
    }
}
