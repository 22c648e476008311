//! `PostgreSQL` adapters for purchases and reviews.

mod models;
mod purchases;
mod reviews;
mod schema;

pub use purchases::PostgresPurchaseRepository;
pub use reviews::PostgresReviewRepository;
