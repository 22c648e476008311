//! `PostgreSQL` repository implementation for jobs.

use super::{models::JobRow, schema::jobs};
use crate::agent::domain::AgentId;
use crate::job::{
    domain::{
        Job, JobFilter, JobId, JobPosting, JobRole, JobStatus, JobType, PersistedJobData,
    },
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::{PgPool, count_to_total, page_bounds, run_blocking, unique_violation};
use crate::skill::domain::SkillCategory;
use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;

/// `PostgreSQL`-backed job repository.
#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> JobRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> JobRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, JobRepositoryError::from_boxed, f).await
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = to_row(job);
        self.run(move |connection| {
            diesel::insert_into(jobs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if unique_violation(&err).is_some() {
                        JobRepositoryError::DuplicateJob(job_id)
                    } else {
                        JobRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = to_row(job);
        self.run(move |connection| {
            let updated_count = diesel::update(jobs::table.filter(jobs::id.eq(job_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(JobRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(JobRepositoryError::NotFound(job_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        self.run(move |connection| {
            let row = jobs::table
                .filter(jobs::id.eq(id.into_inner()))
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()
                .map_err(JobRepositoryError::persistence)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn list(&self, filter: &JobFilter, page: PageRequest) -> JobRepositoryResult<Page<Job>> {
        let filter_owned = *filter;
        let (limit, offset) = page_bounds(page);
        self.run(move |connection| {
            let total: i64 = board_query(filter_owned)
                .count()
                .get_result(connection)
                .map_err(JobRepositoryError::persistence)?;
            let rows = board_query(filter_owned)
                .order(jobs::created_at.desc())
                .limit(limit)
                .offset(offset)
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_job)
                .collect::<JobRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total), page))
        })
        .await
    }

    async fn list_for_agent(
        &self,
        agent_id: AgentId,
        role: JobRole,
    ) -> JobRepositoryResult<Vec<Job>> {
        let agent = agent_id.into_inner();
        self.run(move |connection| {
            let query: jobs::BoxedQuery<'static, Pg> = match role {
                JobRole::Posted => jobs::table.filter(jobs::posted_by.eq(agent)).into_boxed(),
                JobRole::Taken => jobs::table.filter(jobs::taken_by.eq(agent)).into_boxed(),
                JobRole::All => jobs::table
                    .filter(jobs::posted_by.eq(agent).or(jobs::taken_by.eq(agent)))
                    .into_boxed(),
            };
            let rows = query
                .order(jobs::created_at.desc())
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }
}

fn board_query(filter: JobFilter) -> jobs::BoxedQuery<'static, Pg> {
    let mut query = jobs::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(jobs::status.eq(status.as_str()));
    }
    if let Some(category) = filter.category {
        query = query.filter(jobs::category.eq(category.as_str()));
    }
    if let Some(job_type) = filter.job_type {
        query = query.filter(jobs::job_type.eq(job_type.as_str()));
    }
    query
}

fn to_row(job: &Job) -> JobRow {
    let posting = job.posting();
    JobRow {
        id: job.id().into_inner(),
        posted_by: job.posted_by().into_inner(),
        taken_by: job.taken_by().map(AgentId::into_inner),
        title: posting.title().to_owned(),
        description: posting.description().to_owned(),
        job_type: posting.job_type().as_str().to_owned(),
        category: posting.category().as_str().to_owned(),
        requirements: posting.requirements().map(str::to_owned),
        budget: posting.budget().map(str::to_owned),
        status: job.status().as_str().to_owned(),
        started_at: job.started_at(),
        completed_at: job.completed_at(),
        created_at: job.created_at(),
        updated_at: job.updated_at(),
    }
}

fn row_to_job(row: JobRow) -> JobRepositoryResult<Job> {
    let JobRow {
        id,
        posted_by,
        taken_by,
        title,
        description,
        job_type,
        category,
        requirements,
        budget,
        status,
        started_at,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let posting = JobPosting::new(
        &title,
        &description,
        JobType::try_from(job_type.as_str()).map_err(JobRepositoryError::invalid_persisted_data)?,
        SkillCategory::try_from(category.as_str())
            .map_err(JobRepositoryError::invalid_persisted_data)?,
    )
    .and_then(|posting| posting.with_requirements(requirements))
    .and_then(|posting| posting.with_budget(budget))
    .map_err(JobRepositoryError::invalid_persisted_data)?;

    Ok(Job::from_persisted(PersistedJobData {
        id: JobId::from_uuid(id),
        posted_by: AgentId::from_uuid(posted_by),
        posting,
        status: JobStatus::try_from(status.as_str())
            .map_err(JobRepositoryError::invalid_persisted_data)?,
        taken_by: taken_by.map(AgentId::from_uuid),
        started_at,
        completed_at,
        created_at,
        updated_at,
    }))
}
