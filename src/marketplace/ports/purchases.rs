//! Repository port for purchases.

use crate::agent::domain::AgentId;
use crate::marketplace::domain::{Purchase, PurchaseId, TxHash};
use crate::persistence::BoxError;
use crate::skill::domain::SkillId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for purchase repository operations.
pub type PurchaseRepositoryResult<T> = Result<T, PurchaseRepositoryError>;

/// Purchase persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Stores a new purchase.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseRepositoryError::DuplicateTxHash`] when the
    /// transaction was already recorded, or
    /// [`PurchaseRepositoryError::ActivePurchaseExists`] when the buyer
    /// already holds an active purchase of the skill.
    async fn create(&self, purchase: &Purchase) -> PurchaseRepositoryResult<()>;

    /// Persists status and usage changes.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseRepositoryError::NotFound`] when the purchase does
    /// not exist.
    async fn update(&self, purchase: &Purchase) -> PurchaseRepositoryResult<()>;

    /// Finds the buyer's active purchase of a skill.
    async fn find_active(
        &self,
        buyer_id: AgentId,
        skill_id: SkillId,
    ) -> PurchaseRepositoryResult<Option<Purchase>>;

    /// Finds the purchase settled by a transaction.
    async fn find_by_tx_hash(&self, tx_hash: &TxHash)
    -> PurchaseRepositoryResult<Option<Purchase>>;

    /// Lists a buyer's purchases, newest first.
    async fn list_by_buyer(&self, buyer_id: AgentId) -> PurchaseRepositoryResult<Vec<Purchase>>;
}

/// Errors returned by purchase repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PurchaseRepositoryError {
    /// The transaction hash settles another purchase.
    #[error("transaction already processed: {0}")]
    DuplicateTxHash(TxHash),

    /// The buyer already holds an active purchase of the skill.
    #[error("agent {buyer_id} already holds an active purchase of skill {skill_id}")]
    ActivePurchaseExists {
        /// Buyer holding the purchase.
        buyer_id: AgentId,
        /// Skill purchased.
        skill_id: SkillId,
    },

    /// A purchase with the same identifier already exists.
    #[error("duplicate purchase identifier: {0}")]
    DuplicatePurchase(PurchaseId),

    /// The purchase was not found.
    #[error("purchase not found: {0}")]
    NotFound(PurchaseId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PurchaseRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps an already boxed persistence error.
    #[must_use]
    pub fn from_boxed(err: BoxError) -> Self {
        Self::Persistence(Arc::from(err))
    }
}
