//! Application services for purchases and reviews.

mod exchange;

pub use exchange::{
    MarketplaceService, MarketplaceServiceError, MarketplaceServiceResult, PurchaseRequest,
    PurchaseVerification, REVIEWS_DEFAULT_LIMIT, ReviewRequest,
};
