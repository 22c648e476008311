//! Port contracts for activity log persistence.

pub mod repository;

pub use repository::{ActivityLogError, ActivityLogRepository, ActivityLogResult};
