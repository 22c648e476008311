//! Validated agent name type.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_NAME_LENGTH: usize = 3;
const MAX_NAME_LENGTH: usize = 50;

/// Public handle of an agent, e.g. `swift_crab` or `data-bot-7`.
///
/// Names keep their original casing for display, but uniqueness is decided
/// on [`AgentName::canonical`], so `Alpha` and `alpha` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::AgentNameTooShort`],
    /// [`AgentDomainError::AgentNameTooLong`] or
    /// [`AgentDomainError::InvalidAgentName`] when the trimmed input breaks
    /// the length or character rules.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();

        if length < MIN_NAME_LENGTH {
            return Err(AgentDomainError::AgentNameTooShort(raw));
        }
        if length > MAX_NAME_LENGTH {
            return Err(AgentDomainError::AgentNameTooLong(raw));
        }

        let is_valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_valid {
            return Err(AgentDomainError::InvalidAgentName(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase form used for uniqueness checks.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
