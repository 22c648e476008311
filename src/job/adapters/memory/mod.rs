//! In-memory job repository.

mod repository;

pub use repository::InMemoryJobRepository;
