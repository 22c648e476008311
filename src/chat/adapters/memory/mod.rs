//! In-memory chat repository.

mod repository;

pub use repository::InMemoryChatRepository;
