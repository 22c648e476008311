//! Domain model for purchases and reviews.

mod error;
mod ids;
mod license;
mod purchase;
mod review;

pub use error::{MarketplaceDomainError, ParseMarketplaceEnumError};
pub use ids::{PurchaseId, ReviewId};
pub use license::{LicenseType, PurchaseStatus};
pub use purchase::{AccessDenial, PersistedPurchaseData, Purchase, TxHash};
pub use review::{PersistedReviewData, Rating, RatingSummary, Review};
