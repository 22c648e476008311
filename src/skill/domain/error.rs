//! Error types for skill domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating skill domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkillDomainError {
    /// The skill name is outside 3 to 100 characters.
    #[error("skill name must be 3 to 100 characters")]
    InvalidName,

    /// The description is outside 10 to 2000 characters.
    #[error("skill description must be 10 to 2000 characters")]
    InvalidDescription,

    /// The version string is empty or longer than 20 characters.
    #[error("skill version must be 1 to 20 characters")]
    InvalidVersion,

    /// More than ten tags, or a tag that is blank or over 30 characters.
    #[error("at most 10 tags of 1 to 30 characters are allowed")]
    InvalidTags,

    /// A link field is not an absolute URL.
    #[error("invalid {field} URL: {value}")]
    InvalidUrl {
        /// Skill field carrying the URL.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The currency code is not 3 to 10 uppercase alphanumerics.
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    /// An endpoint path is outside 1 to 100 characters.
    #[error("endpoint path must be 1 to 100 characters")]
    InvalidEndpointPath,

    /// An endpoint description exceeds 500 characters.
    #[error("endpoint description exceeds 500 character limit")]
    EndpointDescriptionTooLong,
}

/// Error returned when parsing a skill enumeration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseSkillEnumError {
    /// Enumeration being parsed.
    pub kind: &'static str,
    /// Rejected value.
    pub value: String,
}

impl ParseSkillEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
