//! Error types for job validation and lifecycle transitions.

use super::JobStatus;
use thiserror::Error;

/// Errors returned while validating job content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The title is outside 5 to 200 characters.
    #[error("job title must be 5 to 200 characters")]
    InvalidTitle,

    /// The description is outside 20 to 5000 characters.
    #[error("job description must be 20 to 5000 characters")]
    InvalidDescription,

    /// The requirements exceed 2000 characters.
    #[error("job requirements exceed 2000 character limit")]
    RequirementsTooLong,

    /// The budget label exceeds 100 characters.
    #[error("job budget exceeds 100 character limit")]
    BudgetTooLong,
}

/// Lifecycle rule violations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum JobTransitionError {
    /// Only open jobs can be accepted.
    #[error("job is no longer available (status {0})")]
    NotOpen(JobStatus),

    /// Posters cannot take their own jobs.
    #[error("cannot accept your own job")]
    OwnJob,

    /// Only the poster or taker may complete a job.
    #[error("only the poster or taker may complete this job")]
    NotParticipant,

    /// Only the poster may cancel a job.
    #[error("only the poster may cancel this job")]
    NotPoster,

    /// The job has already been completed or cancelled.
    #[error("job is already {0}")]
    Finished(JobStatus),
}

/// Error returned when parsing a job enumeration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job {kind}: {value}")]
pub struct ParseJobEnumError {
    /// Enumeration being parsed.
    pub kind: &'static str,
    /// Rejected value.
    pub value: String,
}

impl ParseJobEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
