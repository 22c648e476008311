//! In-memory repository for agents, used by tests and demo mode.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent::{
    domain::{Agent, AgentId, AgentName, AgentStat, ApiKeyHash, ClaimToken, WalletAddress},
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};
use crate::pagination::{Page, PageRequest};

/// Thread-safe in-memory agent repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<InMemoryAgentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAgentState {
    agents: HashMap<AgentId, Agent>,
    name_index: HashMap<String, AgentId>,
    key_index: HashMap<ApiKeyHash, AgentId>,
    claim_index: HashMap<ClaimToken, AgentId>,
    wallet_index: HashMap<WalletAddress, AgentId>,
}

impl InMemoryAgentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> AgentRepositoryError {
    AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn register(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.agents.contains_key(&agent.id()) {
            return Err(AgentRepositoryError::DuplicateAgent(agent.id()));
        }
        let name_key = agent.name().canonical();
        if state.name_index.contains_key(&name_key) {
            return Err(AgentRepositoryError::DuplicateName(agent.name().clone()));
        }
        if state.key_index.contains_key(agent.api_key_hash())
            || state.claim_index.contains_key(agent.claim_token())
        {
            return Err(AgentRepositoryError::DuplicateCredential);
        }

        state.name_index.insert(name_key, agent.id());
        state
            .key_index
            .insert(agent.api_key_hash().clone(), agent.id());
        state
            .claim_index
            .insert(agent.claim_token().clone(), agent.id());
        state.agents.insert(agent.id(), agent.clone());
        Ok(())
    }

    async fn update(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let previous_wallet = state
            .agents
            .get(&agent.id())
            .ok_or(AgentRepositoryError::NotFound(agent.id()))?
            .wallet()
            .map(|wallet| wallet.address().clone());
        let next_wallet = agent.wallet().map(|wallet| wallet.address().clone());
        if let Some(address) = &next_wallet {
            if state
                .wallet_index
                .get(address)
                .is_some_and(|holder| *holder != agent.id())
            {
                return Err(AgentRepositoryError::WalletInUse(address.clone()));
            }
        }
        if let Some(address) = previous_wallet {
            state.wallet_index.remove(&address);
        }
        if let Some(address) = next_wallet {
            state.wallet_index.insert(address, agent.id());
        }

        let stored = state
            .agents
            .get_mut(&agent.id())
            .ok_or(AgentRepositoryError::NotFound(agent.id()))?;
        // Counters are owned by `adjust_stat`; keep the stored values.
        let stats = *stored.stats();
        *stored = agent.clone();
        *stored.stats_mut() = stats;
        Ok(())
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.agents.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &AgentName) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .name_index
            .get(&name.canonical())
            .and_then(|id| state.agents.get(id))
            .cloned())
    }

    async fn find_by_api_key_hash(
        &self,
        hash: &ApiKeyHash,
    ) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .key_index
            .get(hash)
            .and_then(|id| state.agents.get(id))
            .cloned())
    }

    async fn find_by_wallet(
        &self,
        address: &WalletAddress,
    ) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .wallet_index
            .get(address)
            .and_then(|id| state.agents.get(id))
            .cloned())
    }

    async fn find_by_claim_token(
        &self,
        token: &ClaimToken,
    ) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .claim_index
            .get(token)
            .and_then(|id| state.agents.get(id))
            .cloned())
    }

    async fn list_claimed(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> AgentRepositoryResult<Page<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<Agent> = state
            .agents
            .values()
            .filter(|agent| agent.is_claimed())
            .filter(|agent| search.is_none_or(|needle| agent.matches_search(needle)))
            .cloned()
            .collect();
        matching.sort_by_key(|agent| Reverse(agent.created_at()));

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn adjust_stat(
        &self,
        id: AgentId,
        stat: AgentStat,
        delta: i32,
    ) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let agent = state
            .agents
            .get_mut(&id)
            .ok_or(AgentRepositoryError::NotFound(id))?;
        agent.stats_mut().adjust(stat, delta);
        Ok(())
    }
}
