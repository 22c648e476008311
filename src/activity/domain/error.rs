//! Error types for activity log validation.

use thiserror::Error;

/// Errors returned while constructing log entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActivityDomainError {
    /// The message is empty or longer than 1000 characters.
    #[error("log message must be 1 to 1000 characters")]
    InvalidMessage,

    /// The metadata exceeds 2000 characters.
    #[error("log metadata exceeds 2000 character limit")]
    MetadataTooLong,

    /// The source label is empty.
    #[error("log source must not be empty")]
    EmptySource,
}

/// Error returned while parsing a log level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(pub String);
