//! Licence and purchase status enumerations.

use super::ParseMarketplaceEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Licence granted by a purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseType {
    /// Personal use.
    #[default]
    Personal,
    /// Commercial use.
    Commercial,
    /// Organisation-wide use.
    Enterprise,
}

impl LicenseType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Commercial => "commercial",
            Self::Enterprise => "enterprise",
        }
    }
}

impl TryFrom<&str> for LicenseType {
    type Error = ParseMarketplaceEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "commercial" => Ok(Self::Commercial),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(ParseMarketplaceEnumError::new("license type", value)),
        }
    }
}

/// Lifecycle status of a purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    /// Grants access.
    #[default]
    Active,
    /// Subscription period elapsed.
    Expired,
    /// Withdrawn before use.
    Cancelled,
    /// Payment returned.
    Refunded,
}

impl PurchaseStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PurchaseStatus {
    type Error = ParseMarketplaceEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ParseMarketplaceEnumError::new("purchase status", value)),
        }
    }
}
