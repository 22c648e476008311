//! Error types for marketplace validation.

use thiserror::Error;

/// Errors returned while constructing marketplace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketplaceDomainError {
    /// The transaction hash is shorter than 10 characters.
    #[error("transaction hash must be at least 10 characters")]
    InvalidTxHash,

    /// The rating is outside 1 to 5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    /// The review comment exceeds 1000 characters.
    #[error("review comment exceeds 1000 character limit")]
    CommentTooLong,
}

/// Error returned when parsing a marketplace enumeration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseMarketplaceEnumError {
    /// Enumeration being parsed.
    pub kind: &'static str,
    /// Rejected value.
    pub value: String,
}

impl ParseMarketplaceEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
