//! Identifier types for the marketplace domain.

use crate::ids::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for a purchase.
    PurchaseId
);

uuid_identifier!(
    /// Unique identifier for a review.
    ReviewId
);
