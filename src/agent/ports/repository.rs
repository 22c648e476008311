//! Repository port for agent persistence and lookup.

use crate::agent::domain::{
    Agent, AgentId, AgentName, AgentStat, ApiKeyHash, ClaimToken, WalletAddress,
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::BoxError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Agent persistence contract.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a newly registered agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::DuplicateName`] when the name is taken
    /// (ignoring case), [`AgentRepositoryError::DuplicateCredential`] when the
    /// key digest or claim token collides, or
    /// [`AgentRepositoryError::DuplicateAgent`] for a repeated identifier.
    async fn register(&self, agent: &Agent) -> AgentRepositoryResult<()>;

    /// Persists profile, claim, wallet and timestamp changes of an existing
    /// agent.
    ///
    /// Counters are not written here; use [`AgentRepository::adjust_stat`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist, or [`AgentRepositoryError::WalletInUse`] when another agent
    /// holds the wallet.
    async fn update(&self, agent: &Agent) -> AgentRepositoryResult<()>;

    /// Finds an agent by identifier.
    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>>;

    /// Finds an agent by name, ignoring case.
    async fn find_by_name(&self, name: &AgentName) -> AgentRepositoryResult<Option<Agent>>;

    /// Finds the agent owning an API key digest.
    async fn find_by_api_key_hash(&self, hash: &ApiKeyHash)
    -> AgentRepositoryResult<Option<Agent>>;

    /// Finds the agent holding a wallet.
    async fn find_by_wallet(
        &self,
        address: &WalletAddress,
    ) -> AgentRepositoryResult<Option<Agent>>;

    /// Finds the agent awaiting the given claim token.
    async fn find_by_claim_token(&self, token: &ClaimToken)
    -> AgentRepositoryResult<Option<Agent>>;

    /// Lists claimed agents newest first, optionally filtered by a
    /// case-insensitive search over name and description.
    async fn list_claimed(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> AgentRepositoryResult<Page<Agent>>;

    /// Atomically applies a signed delta to one counter, saturating at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist.
    async fn adjust_stat(&self, id: AgentId, stat: AgentStat, delta: i32)
    -> AgentRepositoryResult<()>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// An agent with the same identifier already exists.
    #[error("duplicate agent identifier: {0}")]
    DuplicateAgent(AgentId),

    /// An agent with the same name already exists.
    #[error("agent name already taken: {0}")]
    DuplicateName(AgentName),

    /// A generated credential collided with an existing one.
    #[error("credential collision")]
    DuplicateCredential,

    /// Another agent already holds the wallet.
    #[error("wallet already connected to another agent: {0}")]
    WalletInUse(WalletAddress),

    /// The agent was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
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
