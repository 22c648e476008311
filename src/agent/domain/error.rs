//! Error types for agent domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent name is shorter than three characters after trimming.
    #[error("agent name must be at least 3 characters: {0}")]
    AgentNameTooShort(String),

    /// The agent name exceeds the 50-character limit.
    #[error("agent name exceeds 50 character limit: {0}")]
    AgentNameTooLong(String),

    /// The agent name contains characters outside `[A-Za-z0-9_-]`.
    #[error(
        "agent name '{0}' contains invalid characters (only letters, digits, '_' and '-' allowed)"
    )]
    InvalidAgentName(String),

    /// The description exceeds the 500-character limit.
    #[error("agent description exceeds 500 character limit")]
    DescriptionTooLong,

    /// The email address is not plausibly formed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A profile URL could not be parsed as an absolute URL.
    #[error("invalid {field} URL: {value}")]
    InvalidUrl {
        /// Profile field carrying the URL.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The owner handle is empty or longer than 50 characters.
    #[error("owner handle must be 1 to 50 characters")]
    InvalidOwnerHandle,

    /// The agent has already been claimed by an owner.
    #[error("agent already claimed")]
    AlreadyClaimed,

    /// A wallet address is not `0x` followed by 40 hex digits.
    #[error("invalid wallet address: {0}")]
    InvalidWalletAddress(String),

    /// A credential string does not have the expected shape.
    #[error("malformed credential")]
    MalformedCredential,
}

/// Error returned while parsing agent status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
