//! Port contracts for marketplace persistence.

pub mod purchases;
pub mod reviews;

pub use purchases::{PurchaseRepository, PurchaseRepositoryError, PurchaseRepositoryResult};
pub use reviews::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult};

#[cfg(test)]
pub(crate) use purchases::MockPurchaseRepository;
