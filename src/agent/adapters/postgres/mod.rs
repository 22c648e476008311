//! `PostgreSQL` adapters for agent persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresAgentRepository;
