//! The purchase aggregate and licence checks.

use super::{LicenseType, MarketplaceDomainError, PurchaseId, PurchaseStatus};
use crate::agent::domain::AgentId;
use crate::skill::domain::{Skill, SkillId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_TX_HASH_LENGTH: usize = 10;

/// On-chain transaction hash settling a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Validates a transaction hash.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::InvalidTxHash`] for fewer than ten
    /// characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, MarketplaceDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.chars().count() < MIN_TX_HASH_LENGTH {
            return Err(MarketplaceDomainError::InvalidTxHash);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a licence check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDenial {
    /// The buyer holds no active purchase of the skill.
    NoActivePurchase,
    /// The subscription period has elapsed.
    Expired,
    /// The usage allowance is spent.
    UsageLimitReached,
}

impl AccessDenial {
    /// Returns the message shown to callers.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoActivePurchase => "No active purchase found",
            Self::Expired => "Subscription expired",
            Self::UsageLimitReached => "Usage limit reached",
        }
    }
}

/// A buyer's licence to a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    id: PurchaseId,
    buyer_id: AgentId,
    skill_id: SkillId,
    license_type: LicenseType,
    amount_cents: u64,
    currency: String,
    tx_hash: TxHash,
    status: PurchaseStatus,
    expires_at: Option<DateTime<Utc>>,
    usage_limit: Option<u32>,
    current_usage: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Persisted purchase fields used to rebuild the aggregate.
#[derive(Debug, Clone)]
pub struct PersistedPurchaseData {
    /// Purchase identifier.
    pub id: PurchaseId,
    /// Buying agent.
    pub buyer_id: AgentId,
    /// Purchased skill.
    pub skill_id: SkillId,
    /// Granted licence.
    pub license_type: LicenseType,
    /// Price paid in hundredths of the currency unit.
    pub amount_cents: u64,
    /// Currency code.
    pub currency: String,
    /// Settling transaction.
    pub tx_hash: TxHash,
    /// Lifecycle status.
    pub status: PurchaseStatus,
    /// Subscription expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Call allowance.
    pub usage_limit: Option<u32>,
    /// Calls consumed.
    pub current_usage: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Records an active purchase of `skill` at its current price.
    ///
    /// Subscriptions expire one billing interval after purchase and
    /// usage-priced skills carry the default call allowance.
    #[must_use]
    pub fn new(
        buyer_id: AgentId,
        skill: &Skill,
        license_type: LicenseType,
        tx_hash: TxHash,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.utc();
        let pricing = skill.pricing();
        Self {
            id: PurchaseId::new(),
            buyer_id,
            skill_id: skill.id(),
            license_type,
            amount_cents: pricing.price_cents(),
            currency: pricing.currency().to_owned(),
            tx_hash,
            status: PurchaseStatus::Active,
            expires_at: pricing.expiry_from(now),
            usage_limit: pricing.usage_limit(),
            current_usage: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a purchase from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPurchaseData) -> Self {
        Self {
            id: data.id,
            buyer_id: data.buyer_id,
            skill_id: data.skill_id,
            license_type: data.license_type,
            amount_cents: data.amount_cents,
            currency: data.currency,
            tx_hash: data.tx_hash,
            status: data.status,
            expires_at: data.expires_at,
            usage_limit: data.usage_limit,
            current_usage: data.current_usage,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the purchase identifier.
    #[must_use]
    pub const fn id(&self) -> PurchaseId {
        self.id
    }

    /// Returns the buyer.
    #[must_use]
    pub const fn buyer_id(&self) -> AgentId {
        self.buyer_id
    }

    /// Returns the purchased skill.
    #[must_use]
    pub const fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    /// Returns the granted licence.
    #[must_use]
    pub const fn license_type(&self) -> LicenseType {
        self.license_type
    }

    /// Returns the price paid in hundredths of the currency unit.
    #[must_use]
    pub const fn amount_cents(&self) -> u64 {
        self.amount_cents
    }

    /// Returns the currency code.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the settling transaction hash.
    #[must_use]
    pub const fn tx_hash(&self) -> &TxHash {
        &self.tx_hash
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PurchaseStatus {
        self.status
    }

    /// Returns the subscription expiry.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns the call allowance.
    #[must_use]
    pub const fn usage_limit(&self) -> Option<u32> {
        self.usage_limit
    }

    /// Returns the calls consumed so far.
    #[must_use]
    pub const fn current_usage(&self) -> u32 {
        self.current_usage
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` while the purchase grants access.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PurchaseStatus::Active
    }

    /// Checks whether the purchase grants access at `now`.
    ///
    /// # Errors
    ///
    /// Returns the [`AccessDenial`] reason when access is refused.
    pub fn check_access(&self, now: DateTime<Utc>) -> Result<(), AccessDenial> {
        if !self.is_active() {
            return Err(AccessDenial::NoActivePurchase);
        }
        if self.expires_at.is_some_and(|expiry| expiry < now) {
            return Err(AccessDenial::Expired);
        }
        if self
            .usage_limit
            .is_some_and(|limit| self.current_usage >= limit)
        {
            return Err(AccessDenial::UsageLimitReached);
        }
        Ok(())
    }

    /// Marks the purchase expired.
    pub fn expire(&mut self, clock: &impl Clock) {
        self.status = PurchaseStatus::Expired;
        self.updated_at = clock.utc();
    }
}
