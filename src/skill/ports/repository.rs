//! Repository port for skill persistence and catalogue queries.

use crate::agent::domain::AgentId;
use crate::pagination::{Page, PageRequest};
use crate::persistence::BoxError;
use crate::skill::domain::{Skill, SkillCounter, SkillFilter, SkillId, SkillName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for skill repository operations.
pub type SkillRepositoryResult<T> = Result<T, SkillRepositoryError>;

/// Skill persistence contract.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Stores a newly published skill.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::DuplicateName`] when the owner already
    /// has a skill with the same name, or
    /// [`SkillRepositoryError::DuplicateSkill`] for a repeated identifier.
    async fn create(&self, skill: &Skill) -> SkillRepositoryResult<()>;

    /// Persists content, endpoint and publication changes.
    ///
    /// Counters and rating are not written here.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::NotFound`] when the skill does not
    /// exist.
    async fn update(&self, skill: &Skill) -> SkillRepositoryResult<()>;

    /// Deletes a skill.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::NotFound`] when the skill does not
    /// exist.
    async fn delete(&self, id: SkillId) -> SkillRepositoryResult<()>;

    /// Finds a skill by identifier.
    async fn find_by_id(&self, id: SkillId) -> SkillRepositoryResult<Option<Skill>>;

    /// Finds an owner's skill by exact name.
    async fn find_by_owner_and_name(
        &self,
        agent_id: AgentId,
        name: &SkillName,
    ) -> SkillRepositoryResult<Option<Skill>>;

    /// Lists published skills matching `filter`, newest first.
    async fn list_published(
        &self,
        filter: &SkillFilter,
        page: PageRequest,
    ) -> SkillRepositoryResult<Page<Skill>>;

    /// Lists every skill owned by an agent, newest first.
    async fn list_by_owner(&self, agent_id: AgentId) -> SkillRepositoryResult<Vec<Skill>>;

    /// Atomically increments one counter.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::NotFound`] when the skill does not
    /// exist.
    async fn increment(&self, id: SkillId, counter: SkillCounter) -> SkillRepositoryResult<()>;

    /// Stores a recomputed mean rating and review count.
    ///
    /// # Errors
    ///
    /// Returns [`SkillRepositoryError::NotFound`] when the skill does not
    /// exist.
    async fn set_rating(
        &self,
        id: SkillId,
        rating: f64,
        review_count: u32,
    ) -> SkillRepositoryResult<()>;
}

/// Errors returned by skill repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SkillRepositoryError {
    /// A skill with the same identifier already exists.
    #[error("duplicate skill identifier: {0}")]
    DuplicateSkill(SkillId),

    /// The owner already has a skill with this name.
    #[error("agent {agent_id} already has a skill named {name}")]
    DuplicateName {
        /// Owning agent.
        agent_id: AgentId,
        /// Conflicting name.
        name: SkillName,
    },

    /// The skill was not found.
    #[error("skill not found: {0}")]
    NotFound(SkillId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SkillRepositoryError {
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
