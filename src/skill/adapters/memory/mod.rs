//! In-memory skill repository.

mod repository;

pub use repository::InMemorySkillRepository;
