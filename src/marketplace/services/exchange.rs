//! Service layer for buying, verifying and reviewing skills.
//!
//! Purchases adjust three denormalised counters: the skill's
//! `download_count`, the seller's `total_sales` and the buyer's
//! `total_purchases`. Reviews recompute the skill's mean rating.

use crate::agent::{
    domain::{Agent, AgentId, AgentStat},
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::marketplace::{
    domain::{
        AccessDenial, LicenseType, MarketplaceDomainError, Purchase, Rating, Review,
        TxHash,
    },
    ports::{
        PurchaseRepository, PurchaseRepositoryError, ReviewRepository, ReviewRepositoryError,
    },
};
use crate::pagination::{Page, PageRequest};
use crate::skill::{
    domain::{SkillCounter, SkillId},
    ports::{SkillRepository, SkillRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Reviews per page when no limit is given.
pub const REVIEWS_DEFAULT_LIMIT: u32 = 10;

/// Request payload for buying a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    /// Skill to buy.
    pub skill_id: SkillId,
    /// Licence to grant.
    pub license_type: LicenseType,
    /// Settling transaction hash.
    pub tx_hash: String,
}

/// Request payload for reviewing a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    /// Skill under review.
    pub skill_id: SkillId,
    /// Star rating from 1 to 5.
    pub rating: i64,
    /// Optional comment.
    pub comment: Option<String>,
}

/// Outcome of a licence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseVerification {
    /// The buyer may use the skill.
    Valid(Purchase),
    /// Access is refused.
    Denied(AccessDenial),
}

/// Service-level errors for marketplace operations.
#[derive(Debug, Error)]
pub enum MarketplaceServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] MarketplaceDomainError),
    /// Purchase repository operation failed.
    #[error(transparent)]
    Purchases(#[from] PurchaseRepositoryError),
    /// Review repository operation failed.
    #[error(transparent)]
    Reviews(#[from] ReviewRepositoryError),
    /// Skill repository operation failed.
    #[error(transparent)]
    Skills(#[from] SkillRepositoryError),
    /// Agent repository operation failed.
    #[error(transparent)]
    Agents(#[from] AgentRepositoryError),
    /// The skill does not exist.
    #[error("skill not found: {0}")]
    SkillNotFound(SkillId),
    /// Sellers cannot buy their own skills.
    #[error("cannot purchase your own skill")]
    OwnSkill,
    /// The buyer already holds an active purchase of the skill.
    #[error("skill already owned: {0}")]
    AlreadyOwned(SkillId),
    /// Reviews require an active purchase.
    #[error("must purchase skill {0} before reviewing")]
    PurchaseRequired(SkillId),
}

/// Result type for marketplace service operations.
pub type MarketplaceServiceResult<T> = Result<T, MarketplaceServiceError>;

/// Marketplace orchestration service.
pub struct MarketplaceService<P, V, S, A, C>
where
    P: PurchaseRepository + ?Sized,
    V: ReviewRepository + ?Sized,
    S: SkillRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    purchases: Arc<P>,
    reviews: Arc<V>,
    skills: Arc<S>,
    agents: Arc<A>,
    clock: Arc<C>,
}

impl<P, V, S, A, C> Clone for MarketplaceService<P, V, S, A, C>
where
    P: PurchaseRepository + ?Sized,
    V: ReviewRepository + ?Sized,
    S: SkillRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            purchases: Arc::clone(&self.purchases),
            reviews: Arc::clone(&self.reviews),
            skills: Arc::clone(&self.skills),
            agents: Arc::clone(&self.agents),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P, V, S, A, C> MarketplaceService<P, V, S, A, C>
where
    P: PurchaseRepository + ?Sized,
    V: ReviewRepository + ?Sized,
    S: SkillRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new marketplace service.
    #[must_use]
    pub const fn new(
        purchases: Arc<P>,
        reviews: Arc<V>,
        skills: Arc<S>,
        agents: Arc<A>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            purchases,
            reviews,
            skills,
            agents,
            clock,
        }
    }

    /// Buys a skill for `buyer`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceServiceError::SkillNotFound`],
    /// [`MarketplaceServiceError::OwnSkill`],
    /// [`MarketplaceServiceError::AlreadyOwned`] or
    /// [`PurchaseRepositoryError::DuplicateTxHash`] when a rule fails.
    pub async fn purchase(
        &self,
        buyer: &Agent,
        request: PurchaseRequest,
    ) -> MarketplaceServiceResult<Purchase> {
        let PurchaseRequest {
            skill_id,
            license_type,
            tx_hash,
        } = request;
        let hash = TxHash::new(tx_hash)?;

        let skill = self
            .skills
            .find_by_id(skill_id)
            .await?
            .ok_or(MarketplaceServiceError::SkillNotFound(skill_id))?;
        if skill.is_owned_by(buyer.id()) {
            return Err(MarketplaceServiceError::OwnSkill);
        }
        if self.purchases.find_active(buyer.id(), skill_id).await?.is_some() {
            return Err(MarketplaceServiceError::AlreadyOwned(skill_id));
        }
        if self.purchases.find_by_tx_hash(&hash).await?.is_some() {
            return Err(PurchaseRepositoryError::DuplicateTxHash(hash).into());
        }

        let purchase = Purchase::new(buyer.id(), &skill, license_type, hash, &*self.clock);
        self.purchases
            .create(&purchase)
            .await
            .map_err(|err| match err {
                PurchaseRepositoryError::ActivePurchaseExists { skill_id: owned, .. } => {
                    MarketplaceServiceError::AlreadyOwned(owned)
                }
                other => other.into(),
            })?;
        self.skills
            .increment(skill_id, SkillCounter::Download)
            .await?;
        self.agents
            .adjust_stat(skill.agent_id(), AgentStat::TotalSales, 1)
            .await?;
        self.agents
            .adjust_stat(buyer.id(), AgentStat::TotalPurchases, 1)
            .await?;

        tracing::info!(
            purchase_id = %purchase.id(),
            skill_id = %skill_id,
            buyer_id = %buyer.id(),
            "skill purchased"
        );
        Ok(purchase)
    }

    /// Lists a buyer's purchases, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceServiceError::Purchases`] when lookup fails.
    pub async fn my_purchases(&self, buyer_id: AgentId) -> MarketplaceServiceResult<Vec<Purchase>> {
        Ok(self.purchases.list_by_buyer(buyer_id).await?)
    }

    /// Checks whether `buyer_id` may use `skill_id` now.
    ///
    /// An elapsed subscription is marked expired as a side effect.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceServiceError::Purchases`] when lookup or the
    /// expiry write fails.
    pub async fn verify(
        &self,
        buyer_id: AgentId,
        skill_id: SkillId,
    ) -> MarketplaceServiceResult<PurchaseVerification> {
        let Some(mut purchase) = self.purchases.find_active(buyer_id, skill_id).await? else {
            return Ok(PurchaseVerification::Denied(AccessDenial::NoActivePurchase));
        };
        match purchase.check_access(self.clock.utc()) {
            Ok(()) => Ok(PurchaseVerification::Valid(purchase)),
            Err(AccessDenial::Expired) => {
                purchase.expire(&*self.clock);
                self.purchases.update(&purchase).await?;
                tracing::info!(purchase_id = %purchase.id(), "subscription expired");
                Ok(PurchaseVerification::Denied(AccessDenial::Expired))
            }
            Err(denial) => Ok(PurchaseVerification::Denied(denial)),
        }
    }

    /// Records a review and recomputes the skill's rating.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceServiceError::PurchaseRequired`] without an
    /// active purchase, or [`ReviewRepositoryError::DuplicateReview`] for a
    /// second review.
    pub async fn review(
        &self,
        reviewer: &Agent,
        request: ReviewRequest,
    ) -> MarketplaceServiceResult<Review> {
        let ReviewRequest {
            skill_id,
            rating,
            comment,
        } = request;
        let stars = Rating::new(rating)?;

        if self
            .purchases
            .find_active(reviewer.id(), skill_id)
            .await?
            .is_none()
        {
            return Err(MarketplaceServiceError::PurchaseRequired(skill_id));
        }
        if self
            .reviews
            .find_by_reviewer(reviewer.id(), skill_id)
            .await?
            .is_some()
        {
            return Err(ReviewRepositoryError::DuplicateReview {
                reviewer_id: reviewer.id(),
                skill_id,
            }
            .into());
        }

        let review = Review::new(reviewer, skill_id, stars, comment, &*self.clock)?;
        self.reviews.create(&review).await?;

        let summary = self.reviews.summarize(skill_id).await?;
        self.skills
            .set_rating(skill_id, summary.mean(), summary.count)
            .await?;
        Ok(review)
    }

    /// Lists a skill's reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceServiceError::Reviews`] when lookup fails.
    pub async fn reviews(
        &self,
        skill_id: SkillId,
        page: PageRequest,
    ) -> MarketplaceServiceResult<Page<Review>> {
        Ok(self.reviews.list_for_skill(skill_id, page).await?)
    }
}
