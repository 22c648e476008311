//! `PostgreSQL` repository implementation for reviews.

use super::{models::ReviewRow, schema::reviews};
use crate::agent::domain::AgentId;
use crate::marketplace::{
    domain::{PersistedReviewData, Rating, RatingSummary, Review, ReviewId},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::{
    PgPool, column_to_counter, count_to_total, page_bounds, run_blocking, unique_violation,
};
use crate::skill::domain::SkillId;
use async_trait::async_trait;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;

/// `PostgreSQL`-backed review repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ReviewRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReviewRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, ReviewRepositoryError::from_boxed, f).await
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &Review) -> ReviewRepositoryResult<()> {
        let reviewer_id = review.reviewer_id();
        let skill_id = review.skill_id();
        let row = ReviewRow {
            id: review.id().into_inner(),
            reviewer_id: reviewer_id.into_inner(),
            reviewer_name: review.reviewer_name().to_owned(),
            skill_id: skill_id.into_inner(),
            rating: i32::from(review.rating().value()),
            comment: review.comment().map(str::to_owned),
            created_at: review.created_at(),
        };
        self.run(move |connection| {
            diesel::insert_into(reviews::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if unique_violation(&err).is_some() {
                        ReviewRepositoryError::DuplicateReview {
                            reviewer_id,
                            skill_id,
                        }
                    } else {
                        ReviewRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_reviewer(
        &self,
        reviewer_id: AgentId,
        skill_id: SkillId,
    ) -> ReviewRepositoryResult<Option<Review>> {
        self.run(move |connection| {
            let row = reviews::table
                .filter(reviews::reviewer_id.eq(reviewer_id.into_inner()))
                .filter(reviews::skill_id.eq(skill_id.into_inner()))
                .select(ReviewRow::as_select())
                .first::<ReviewRow>(connection)
                .optional()
                .map_err(ReviewRepositoryError::persistence)?;
            row.map(row_to_review).transpose()
        })
        .await
    }

    async fn list_for_skill(
        &self,
        skill_id: SkillId,
        page: PageRequest,
    ) -> ReviewRepositoryResult<Page<Review>> {
        let (limit, offset) = page_bounds(page);
        self.run(move |connection| {
            let skill = skill_id.into_inner();
            let total: i64 = reviews::table
                .filter(reviews::skill_id.eq(skill))
                .count()
                .get_result(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            let rows = reviews::table
                .filter(reviews::skill_id.eq(skill))
                .order(reviews::created_at.desc())
                .limit(limit)
                .offset(offset)
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_review)
                .collect::<ReviewRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total), page))
        })
        .await
    }

    async fn summarize(&self, skill_id: SkillId) -> ReviewRepositoryResult<RatingSummary> {
        self.run(move |connection| {
            let (rating_sum, rating_count): (Option<i64>, i64) = reviews::table
                .filter(reviews::skill_id.eq(skill_id.into_inner()))
                .select((sum(reviews::rating), count_star()))
                .first(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            Ok(RatingSummary {
                total: count_to_total(rating_sum.unwrap_or_default()),
                count: column_to_counter(i32::try_from(rating_count).unwrap_or(i32::MAX)),
            })
        })
        .await
    }
}

fn row_to_review(row: ReviewRow) -> ReviewRepositoryResult<Review> {
    Ok(Review::from_persisted(PersistedReviewData {
        id: ReviewId::from_uuid(row.id),
        reviewer_id: AgentId::from_uuid(row.reviewer_id),
        reviewer_name: row.reviewer_name,
        skill_id: SkillId::from_uuid(row.skill_id),
        rating: Rating::new(i64::from(row.rating))
            .map_err(ReviewRepositoryError::invalid_persisted_data)?,
        comment: row.comment,
        created_at: row.created_at,
    }))
}
