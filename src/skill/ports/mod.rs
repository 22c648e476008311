//! Port contracts for skill persistence.

pub mod repository;

pub use repository::{SkillRepository, SkillRepositoryError, SkillRepositoryResult};
