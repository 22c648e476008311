//! Skill pricing models.

use super::{ParseSkillEnumError, SkillDomainError};
use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_CURRENCY: &str = "USDC";

/// Calls granted by a usage-priced purchase.
pub const DEFAULT_USAGE_LIMIT: u32 = 1000;

/// Billing period of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    /// One day.
    Daily,
    /// Seven days.
    Weekly,
    /// One calendar month.
    Monthly,
}

impl BillingInterval {
    /// Returns the end of a period starting at `start`.
    ///
    /// Monthly periods keep the day of month, clamped to the last day of a
    /// shorter month. Returns `None` only on calendar overflow.
    #[must_use]
    pub fn period_end(self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Daily => start.checked_add_days(Days::new(1)),
            Self::Weekly => start.checked_add_days(Days::new(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
        }
    }
}

impl TryFrom<&str> for BillingInterval {
    type Error = ParseSkillEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParseSkillEnumError::new("billing interval", value)),
        }
    }
}

/// How a skill is charged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PricingModel {
    /// No charge.
    Free,
    /// Single payment for perpetual access.
    OneTime,
    /// Recurring access that expires after each interval.
    Subscription {
        /// Length of each paid period.
        interval: BillingInterval,
    },
    /// Pay-per-call with a fixed call allowance.
    Usage,
}

/// Price, currency and model of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    price_cents: u64,
    currency: String,
    model: PricingModel,
}

impl Pricing {
    /// Creates a validated pricing record.
    ///
    /// # Errors
    ///
    /// Returns [`SkillDomainError::InvalidCurrency`] unless the currency is 3
    /// to 10 ASCII uppercase letters or digits.
    pub fn new(
        price_cents: u64,
        currency: Option<String>,
        model: PricingModel,
    ) -> Result<Self, SkillDomainError> {
        let code = currency
            .map(|text| text.trim().to_ascii_uppercase())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned());
        let is_valid = (3..=10).contains(&code.len())
            && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !is_valid {
            return Err(SkillDomainError::InvalidCurrency(code));
        }
        Ok(Self {
            price_cents,
            currency: code,
            model,
        })
    }

    /// Free pricing in the default currency.
    #[must_use]
    pub fn free() -> Self {
        Self {
            price_cents: 0,
            currency: DEFAULT_CURRENCY.to_owned(),
            model: PricingModel::Free,
        }
    }

    /// Returns the price in hundredths of the currency unit.
    #[must_use]
    pub const fn price_cents(&self) -> u64 {
        self.price_cents
    }

    /// Returns the currency code.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the pricing model.
    #[must_use]
    pub const fn model(&self) -> PricingModel {
        self.model
    }

    /// Returns when a purchase made at `purchased_at` expires.
    #[must_use]
    pub fn expiry_from(&self, purchased_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.model {
            PricingModel::Subscription { interval } => interval.period_end(purchased_at),
            PricingModel::Free | PricingModel::OneTime | PricingModel::Usage => None,
        }
    }

    /// Returns the call allowance granted by a purchase.
    #[must_use]
    pub const fn usage_limit(&self) -> Option<u32> {
        match self.model {
            PricingModel::Usage => Some(DEFAULT_USAGE_LIMIT),
            PricingModel::Free | PricingModel::OneTime | PricingModel::Subscription { .. } => None,
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::free()
    }
}
