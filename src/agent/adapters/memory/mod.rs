//! In-memory agent repository.

mod repository;

pub use repository::InMemoryAgentRepository;
