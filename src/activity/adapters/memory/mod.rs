//! In-memory activity log.

mod repository;

pub use repository::InMemoryActivityLog;
