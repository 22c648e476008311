//! In-memory purchase and review repositories.

mod purchases;
mod reviews;

pub use purchases::InMemoryPurchaseRepository;
pub use reviews::InMemoryReviewRepository;

fn lock_error(err: impl ToString) -> std::io::Error {
    std::io::Error::other(err.to_string())
}
