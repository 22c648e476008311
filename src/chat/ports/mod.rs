//! Port contracts for chat persistence.

pub mod repository;

pub use repository::{ChatRepository, ChatRepositoryError, ChatRepositoryResult};
