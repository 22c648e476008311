//! Service layer for posting and progressing jobs.

use crate::activity::{ports::ActivityLogRepository, services::ActivityJournal};
use crate::agent::{
    domain::{Agent, AgentId, AgentStat},
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::job::{
    domain::{
        Job, JobDomainError, JobFilter, JobId, JobPosting, JobRole, JobTransitionError, JobType,
    },
    ports::{JobRepository, JobRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::skill::domain::SkillCategory;
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for posting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostJobRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Job type.
    pub job_type: JobType,
    /// Category.
    pub category: SkillCategory,
    /// Free-text requirements.
    pub requirements: Option<String>,
    /// Free-text budget label.
    pub budget: Option<String>,
}

/// Service-level errors for job operations.
#[derive(Debug, Error)]
pub enum JobServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] JobDomainError),
    /// A lifecycle rule was violated.
    #[error(transparent)]
    Transition(#[from] JobTransitionError),
    /// Job repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),
    /// Agent repository operation failed.
    #[error(transparent)]
    Agents(#[from] AgentRepositoryError),
}

/// Result type for job service operations.
pub type JobServiceResult<T> = Result<T, JobServiceError>;

/// Job board orchestration service.
pub struct JobBoardService<J, A, L, C>
where
    J: JobRepository + ?Sized,
    A: AgentRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    jobs: Arc<J>,
    agents: Arc<A>,
    journal: ActivityJournal<L, C>,
    clock: Arc<C>,
}

impl<J, A, L, C> Clone for JobBoardService<J, A, L, C>
where
    J: JobRepository + ?Sized,
    A: AgentRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            agents: Arc::clone(&self.agents),
            journal: self.journal.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<J, A, L, C> JobBoardService<J, A, L, C>
where
    J: JobRepository + ?Sized,
    A: AgentRepository + ?Sized,
    L: ActivityLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new job board service.
    #[must_use]
    pub const fn new(
        jobs: Arc<J>,
        agents: Arc<A>,
        journal: ActivityJournal<L, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            jobs,
            agents,
            journal,
            clock,
        }
    }

    /// Posts an open job on behalf of `poster`.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when validation fails.
    pub async fn post(&self, poster: &Agent, request: PostJobRequest) -> JobServiceResult<Job> {
        let PostJobRequest {
            title,
            description,
            job_type,
            category,
            requirements,
            budget,
        } = request;
        let posting = JobPosting::new(title, description, job_type, category)?
            .with_requirements(requirements)?
            .with_budget(budget)?;

        let job = Job::post(poster.id(), posting, &*self.clock);
        self.jobs.create(&job).await?;

        tracing::info!(job_id = %job.id(), agent_id = %poster.id(), "job posted");
        self.journal
            .note(
                poster,
                format!("New job posted: {}", job.posting().title()),
                &json!({ "jobId": job.id(), "category": category }),
            )
            .await;
        Ok(job)
    }

    /// Lists jobs on the board, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when lookup fails.
    pub async fn list(&self, filter: &JobFilter, page: PageRequest) -> JobServiceResult<Page<Job>> {
        Ok(self.jobs.list(filter, page).await?)
    }

    /// Returns a job by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::NotFound`] when the job is missing.
    pub async fn get(&self, id: JobId) -> JobServiceResult<Job> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| JobRepositoryError::NotFound(id).into())
    }

    /// Accepts an open job for `taker`.
    ///
    /// # Errors
    ///
    /// Returns [`JobTransitionError::NotOpen`] or
    /// [`JobTransitionError::OwnJob`] when the job cannot be taken.
    pub async fn accept(&self, taker: &Agent, id: JobId) -> JobServiceResult<Job> {
        let mut job = self.get(id).await?;
        job.accept(taker.id(), &*self.clock)?;
        self.jobs.update(&job).await?;

        tracing::info!(job_id = %id, agent_id = %taker.id(), "job accepted");
        self.journal
            .note(
                taker,
                format!("Job accepted: {} by {}", job.posting().title(), taker.name()),
                &json!({ "jobId": id, "acceptedBy": taker.id() }),
            )
            .await;
        Ok(job)
    }

    /// Completes a job and credits the taker.
    ///
    /// # Errors
    ///
    /// Returns [`JobTransitionError::NotParticipant`] when `actor` neither
    /// posted nor took the job.
    pub async fn complete(&self, actor: &Agent, id: JobId) -> JobServiceResult<Job> {
        let mut job = self.get(id).await?;
        job.complete(actor.id(), &*self.clock)?;
        self.jobs.update(&job).await?;
        if let Some(taker) = job.taken_by() {
            self.agents
                .adjust_stat(taker, AgentStat::CompletedJobs, 1)
                .await?;
        }

        tracing::info!(job_id = %id, agent_id = %actor.id(), "job completed");
        self.journal
            .note(
                actor,
                format!("Job completed: {}", job.posting().title()),
                &json!({ "jobId": id }),
            )
            .await;
        Ok(job)
    }

    /// Cancels a job on behalf of its poster.
    ///
    /// # Errors
    ///
    /// Returns [`JobTransitionError::NotPoster`] for anyone but the poster,
    /// or [`JobTransitionError::Finished`] for an ended job.
    pub async fn cancel(&self, actor: &Agent, id: JobId) -> JobServiceResult<Job> {
        let mut job = self.get(id).await?;
        job.cancel(actor.id(), &*self.clock)?;
        self.jobs.update(&job).await?;
        tracing::info!(job_id = %id, agent_id = %actor.id(), "job cancelled");
        Ok(job)
    }

    /// Lists the jobs an agent posted, took, or both.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when lookup fails.
    pub async fn mine(&self, agent_id: AgentId, role: JobRole) -> JobServiceResult<Vec<Job>> {
        Ok(self.jobs.list_for_agent(agent_id, role).await?)
    }
}
