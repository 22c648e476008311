//! In-memory review repository.

use super::lock_error;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent::domain::AgentId;
use crate::marketplace::{
    domain::{RatingSummary, Review},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::skill::domain::SkillId;

/// Thread-safe in-memory review repository, keyed by reviewer and skill.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<(AgentId, SkillId), Review>>>,
}

impl InMemoryReviewRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> ReviewRepositoryError {
    ReviewRepositoryError::persistence(lock_error(err))
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, review: &Review) -> ReviewRepositoryResult<()> {
        let mut reviews = self.reviews.write().map_err(poisoned)?;
        let key = (review.reviewer_id(), review.skill_id());
        if reviews.contains_key(&key) {
            return Err(ReviewRepositoryError::DuplicateReview {
                reviewer_id: review.reviewer_id(),
                skill_id: review.skill_id(),
            });
        }
        reviews.insert(key, review.clone());
        Ok(())
    }

    async fn find_by_reviewer(
        &self,
        reviewer_id: AgentId,
        skill_id: SkillId,
    ) -> ReviewRepositoryResult<Option<Review>> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        Ok(reviews.get(&(reviewer_id, skill_id)).cloned())
    }

    async fn list_for_skill(
        &self,
        skill_id: SkillId,
        page: PageRequest,
    ) -> ReviewRepositoryResult<Page<Review>> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|review| review.skill_id() == skill_id)
            .cloned()
            .collect();
        matching.sort_by_key(|review| Reverse(review.created_at()));
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn summarize(&self, skill_id: SkillId) -> ReviewRepositoryResult<RatingSummary> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        Ok(reviews
            .values()
            .filter(|review| review.skill_id() == skill_id)
            .fold(RatingSummary::default(), |summary, review| RatingSummary {
                total: summary.total.saturating_add(u64::from(review.rating().value())),
                count: summary.count.saturating_add(1),
            }))
    }
}
