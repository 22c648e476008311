//! Repository port for reviews.

use crate::agent::domain::AgentId;
use crate::marketplace::domain::{RatingSummary, Review};
use crate::pagination::{Page, PageRequest};
use crate::persistence::BoxError;
use crate::skill::domain::SkillId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Review persistence contract.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Stores a review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicateReview`] when the reviewer
    /// already reviewed the skill.
    async fn create(&self, review: &Review) -> ReviewRepositoryResult<()>;

    /// Finds a reviewer's review of a skill.
    async fn find_by_reviewer(
        &self,
        reviewer_id: AgentId,
        skill_id: SkillId,
    ) -> ReviewRepositoryResult<Option<Review>>;

    /// Lists a skill's reviews, newest first.
    async fn list_for_skill(
        &self,
        skill_id: SkillId,
        page: PageRequest,
    ) -> ReviewRepositoryResult<Page<Review>>;

    /// Returns the sum and count of a skill's ratings.
    async fn summarize(&self, skill_id: SkillId) -> ReviewRepositoryResult<RatingSummary>;
}

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// The reviewer already reviewed this skill.
    #[error("agent {reviewer_id} already reviewed skill {skill_id}")]
    DuplicateReview {
        /// Reviewing agent.
        reviewer_id: AgentId,
        /// Reviewed skill.
        skill_id: SkillId,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
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
