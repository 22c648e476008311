//! Skill reviews and rating aggregation.

use super::{MarketplaceDomainError, ReviewId};
use crate::agent::domain::{Agent, AgentId};
use crate::skill::domain::SkillId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_COMMENT_LENGTH: usize = 1000;

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Validates a rating.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::InvalidRating`] outside 1 to 5.
    pub fn new(value: i64) -> Result<Self, MarketplaceDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (1..=5).contains(stars))
            .map(Self)
            .ok_or(MarketplaceDomainError::InvalidRating(value))
    }

    /// Returns the number of stars.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Sum and count of a skill's ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSummary {
    /// Sum of every rating.
    pub total: u64,
    /// Number of ratings.
    pub count: u32,
}

impl RatingSummary {
    /// Returns the mean rating, `0.0` when there are no ratings.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "mean rating is stored as a float"
    )]
    pub fn mean(self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let total = u32::try_from(self.total).map_or(f64::from(u32::MAX), f64::from);
        total / f64::from(self.count)
    }
}

/// A buyer's review of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    id: ReviewId,
    reviewer_id: AgentId,
    reviewer_name: String,
    skill_id: SkillId,
    rating: Rating,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

/// Persisted review fields used to rebuild the aggregate.
#[derive(Debug, Clone)]
pub struct PersistedReviewData {
    /// Review identifier.
    pub id: ReviewId,
    /// Reviewing agent.
    pub reviewer_id: AgentId,
    /// Reviewer name at posting time.
    pub reviewer_name: String,
    /// Reviewed skill.
    pub skill_id: SkillId,
    /// Star rating.
    pub rating: Rating,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review by `reviewer`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::CommentTooLong`] past 1000
    /// characters.
    pub fn new(
        reviewer: &Agent,
        skill_id: SkillId,
        rating: Rating,
        comment: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, MarketplaceDomainError> {
        if comment
            .as_ref()
            .is_some_and(|text| text.chars().count() > MAX_COMMENT_LENGTH)
        {
            return Err(MarketplaceDomainError::CommentTooLong);
        }
        Ok(Self {
            id: ReviewId::new(),
            reviewer_id: reviewer.id(),
            reviewer_name: reviewer.name().as_str().to_owned(),
            skill_id,
            rating,
            comment: comment.filter(|text| !text.trim().is_empty()),
            created_at: clock.utc(),
        })
    }

    /// Rebuilds a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            reviewer_id: data.reviewer_id,
            reviewer_name: data.reviewer_name,
            skill_id: data.skill_id,
            rating: data.rating,
            comment: data.comment,
            created_at: data.created_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the reviewer.
    #[must_use]
    pub const fn reviewer_id(&self) -> AgentId {
        self.reviewer_id
    }

    /// Returns the reviewer's name at posting time.
    #[must_use]
    pub fn reviewer_name(&self) -> &str {
        &self.reviewer_name
    }

    /// Returns the reviewed skill.
    #[must_use]
    pub const fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    /// Returns the rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
