//! In-memory purchase repository.

use super::lock_error;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent::domain::AgentId;
use crate::marketplace::{
    domain::{Purchase, PurchaseId, TxHash},
    ports::{PurchaseRepository, PurchaseRepositoryError, PurchaseRepositoryResult},
};
use crate::skill::domain::SkillId;

/// Thread-safe in-memory purchase repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPurchaseRepository {
    state: Arc<RwLock<PurchaseState>>,
}

#[derive(Debug, Default)]
struct PurchaseState {
    purchases: HashMap<PurchaseId, Purchase>,
    tx_index: HashMap<TxHash, PurchaseId>,
}

impl InMemoryPurchaseRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> PurchaseRepositoryError {
    PurchaseRepositoryError::persistence(lock_error(err))
}

#[async_trait]
impl PurchaseRepository for InMemoryPurchaseRepository {
    async fn create(&self, purchase: &Purchase) -> PurchaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.purchases.contains_key(&purchase.id()) {
            return Err(PurchaseRepositoryError::DuplicatePurchase(purchase.id()));
        }
        if state.tx_index.contains_key(purchase.tx_hash()) {
            return Err(PurchaseRepositoryError::DuplicateTxHash(
                purchase.tx_hash().clone(),
            ));
        }
        let holds_active = |held: &Purchase| {
            held.is_active()
                && held.buyer_id() == purchase.buyer_id()
                && held.skill_id() == purchase.skill_id()
        };
        if purchase.is_active() && state.purchases.values().any(holds_active) {
            return Err(PurchaseRepositoryError::ActivePurchaseExists {
                buyer_id: purchase.buyer_id(),
                skill_id: purchase.skill_id(),
            });
        }
        state
            .tx_index
            .insert(purchase.tx_hash().clone(), purchase.id());
        state.purchases.insert(purchase.id(), purchase.clone());
        Ok(())
    }

    async fn update(&self, purchase: &Purchase) -> PurchaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .purchases
            .get_mut(&purchase.id())
            .ok_or(PurchaseRepositoryError::NotFound(purchase.id()))?;
        *stored = purchase.clone();
        Ok(())
    }

    async fn find_active(
        &self,
        buyer_id: AgentId,
        skill_id: SkillId,
    ) -> PurchaseRepositoryResult<Option<Purchase>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .purchases
            .values()
            .find(|purchase| {
                purchase.is_active()
                    && purchase.buyer_id() == buyer_id
                    && purchase.skill_id() == skill_id
            })
            .cloned())
    }

    async fn find_by_tx_hash(
        &self,
        tx_hash: &TxHash,
    ) -> PurchaseRepositoryResult<Option<Purchase>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .tx_index
            .get(tx_hash)
            .and_then(|id| state.purchases.get(id))
            .cloned())
    }

    async fn list_by_buyer(&self, buyer_id: AgentId) -> PurchaseRepositoryResult<Vec<Purchase>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut owned: Vec<Purchase> = state
            .purchases
            .values()
            .filter(|purchase| purchase.buyer_id() == buyer_id)
            .cloned()
            .collect();
        owned.sort_by_key(|purchase| Reverse(purchase.created_at()));
        Ok(owned)
    }
}
