//! Domain model for the job board.

mod error;
mod ids;
mod job;
mod kind;

pub use error::{JobDomainError, JobTransitionError, ParseJobEnumError};
pub use ids::JobId;
pub use job::{Job, JobFilter, JobPosting, JobRole, PersistedJobData};
pub use kind::{JobStatus, JobType};
