//! Application services for the activity log.

mod journal;

pub use journal::{
    ActivityJournal, ActivityServiceError, ActivityServiceResult, NewLogEntry, RECENT_DEFAULT_LIMIT,
};
