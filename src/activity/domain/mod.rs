//! Domain model for activity log entries.

mod entry;
mod error;
mod ids;
mod level;

pub use entry::{LevelCount, LogEntry, LogFilter, LogStats, PersistedLogEntryData};
pub use error::{ActivityDomainError, ParseLogLevelError};
pub use ids::LogEntryId;
pub use level::LogLevel;
