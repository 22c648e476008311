//! In-memory repository for jobs, used by tests and demo mode.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent::domain::AgentId;
use crate::job::{
    domain::{Job, JobFilter, JobId, JobRole},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};
use crate::pagination::{Page, PageRequest};

/// Thread-safe in-memory job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_newest_first(&self, keep: impl Fn(&Job) -> bool) -> JobRepositoryResult<Vec<Job>> {
        let jobs = self.jobs.read().map_err(lock_error)?;
        let mut matching: Vec<Job> = jobs.values().filter(|job| keep(job)).cloned().collect();
        matching.sort_by_key(|job| Reverse(job.created_at()));
        Ok(matching)
    }
}

fn lock_error(err: impl ToString) -> JobRepositoryError {
    JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.jobs.write().map_err(lock_error)?;
        if jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.jobs.write().map_err(lock_error)?;
        let stored = jobs
            .get_mut(&job.id())
            .ok_or(JobRepositoryError::NotFound(job.id()))?;
        *stored = job.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let jobs = self.jobs.read().map_err(lock_error)?;
        Ok(jobs.get(&id).cloned())
    }

    async fn list(&self, filter: &JobFilter, page: PageRequest) -> JobRepositoryResult<Page<Job>> {
        let matching = self.collect_newest_first(|job| job.matches(filter))?;
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn list_for_agent(
        &self,
        agent_id: AgentId,
        role: JobRole,
    ) -> JobRepositoryResult<Vec<Job>> {
        self.collect_newest_first(|job| job.belongs_to(agent_id, role))
    }
}
