//! The job aggregate and its lifecycle.

use super::{JobDomainError, JobId, JobStatus, JobTransitionError, JobType, ParseJobEnumError};
use crate::agent::domain::AgentId;
use crate::skill::domain::SkillCategory;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const TITLE_LENGTH: std::ops::RangeInclusive<usize> = 5..=200;
const DESCRIPTION_LENGTH: std::ops::RangeInclusive<usize> = 20..=5000;
const MAX_REQUIREMENTS_LENGTH: usize = 2000;
const MAX_BUDGET_LENGTH: usize = 100;

/// Validated content of a job about to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    title: String,
    description: String,
    #[serde(rename = "type")]
    job_type: JobType,
    category: SkillCategory,
    requirements: Option<String>,
    budget: Option<String>,
}

impl JobPosting {
    /// Creates a posting with the mandatory fields.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidTitle`] or
    /// [`JobDomainError::InvalidDescription`] when a length bound fails.
    pub fn new(
        title: impl AsRef<str>,
        description: impl AsRef<str>,
        job_type: JobType,
        category: SkillCategory,
    ) -> Result<Self, JobDomainError> {
        let title_text = title.as_ref().trim();
        if !TITLE_LENGTH.contains(&title_text.chars().count()) {
            return Err(JobDomainError::InvalidTitle);
        }
        let description_text = description.as_ref().trim();
        if !DESCRIPTION_LENGTH.contains(&description_text.chars().count()) {
            return Err(JobDomainError::InvalidDescription);
        }
        Ok(Self {
            title: title_text.to_owned(),
            description: description_text.to_owned(),
            job_type,
            category,
            requirements: None,
            budget: None,
        })
    }

    /// Sets the free-text requirements.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::RequirementsTooLong`] past 2000 characters.
    pub fn with_requirements(mut self, requirements: Option<String>) -> Result<Self, JobDomainError> {
        if requirements
            .as_ref()
            .is_some_and(|text| text.chars().count() > MAX_REQUIREMENTS_LENGTH)
        {
            return Err(JobDomainError::RequirementsTooLong);
        }
        self.requirements = requirements.filter(|text| !text.trim().is_empty());
        Ok(self)
    }

    /// Sets the free-text budget label, such as `"50 USDC"`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::BudgetTooLong`] past 100 characters.
    pub fn with_budget(mut self, budget: Option<String>) -> Result<Self, JobDomainError> {
        if budget
            .as_ref()
            .is_some_and(|text| text.chars().count() > MAX_BUDGET_LENGTH)
        {
            return Err(JobDomainError::BudgetTooLong);
        }
        self.budget = budget.filter(|text| !text.trim().is_empty());
        Ok(self)
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the job type.
    #[must_use]
    pub const fn job_type(&self) -> JobType {
        self.job_type
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> SkillCategory {
        self.category
    }

    /// Returns the requirements.
    #[must_use]
    pub fn requirements(&self) -> Option<&str> {
        self.requirements.as_deref()
    }

    /// Returns the budget label.
    #[must_use]
    pub fn budget(&self) -> Option<&str> {
        self.budget.as_deref()
    }
}

/// Listing filter for the public job board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Restrict to one status; `None` lists every status.
    pub status: Option<JobStatus>,
    /// Restrict to one category.
    pub category: Option<SkillCategory>,
    /// Restrict to one engagement type.
    pub job_type: Option<JobType>,
}

impl JobFilter {
    /// Filter matching open jobs only.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            status: Some(JobStatus::Open),
            category: None,
            job_type: None,
        }
    }
}

/// Which side of a job an agent's listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobRole {
    /// Jobs the agent posted.
    Posted,
    /// Jobs the agent took.
    Taken,
    /// Both.
    #[default]
    All,
}

impl TryFrom<&str> for JobRole {
    type Error = ParseJobEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "posted" => Ok(Self::Posted),
            "taken" => Ok(Self::Taken),
            "all" => Ok(Self::All),
            _ => Err(ParseJobEnumError::new("role", value)),
        }
    }
}

/// A job posted on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    id: JobId,
    posted_by: AgentId,
    #[serde(flatten)]
    posting: JobPosting,
    status: JobStatus,
    taken_by: Option<AgentId>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Persisted job fields used to rebuild the aggregate.
#[derive(Debug, Clone)]
pub struct PersistedJobData {
    /// Job identifier.
    pub id: JobId,
    /// Poster.
    pub posted_by: AgentId,
    /// Validated content.
    pub posting: JobPosting,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Taker, once accepted.
    pub taken_by: Option<AgentId>,
    /// Acceptance timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Posts a new open job.
    #[must_use]
    pub fn post(posted_by: AgentId, posting: JobPosting, clock: &impl Clock) -> Self {
        let now = clock.utc();
        Self {
            id: JobId::new(),
            posted_by,
            posting,
            status: JobStatus::Open,
            taken_by: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            posted_by: data.posted_by,
            posting: data.posting,
            status: data.status,
            taken_by: data.taken_by,
            started_at: data.started_at,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the poster.
    #[must_use]
    pub const fn posted_by(&self) -> AgentId {
        self.posted_by
    }

    /// Returns the posted content.
    #[must_use]
    pub const fn posting(&self) -> &JobPosting {
        &self.posting
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the taker, once accepted.
    #[must_use]
    pub const fn taken_by(&self) -> Option<AgentId> {
        self.taken_by
    }

    /// Returns when the job was accepted.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the job was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assigns the job to `taker` and starts it.
    ///
    /// # Errors
    ///
    /// Returns [`JobTransitionError::NotOpen`] unless the job is open, or
    /// [`JobTransitionError::OwnJob`] when `taker` posted it.
    pub fn accept(&mut self, taker: AgentId, clock: &impl Clock) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Open {
            return Err(JobTransitionError::NotOpen(self.status));
        }
        if taker == self.posted_by {
            return Err(JobTransitionError::OwnJob);
        }
        let now = clock.utc();
        self.status = JobStatus::InProgress;
        self.taken_by = Some(taker);
        self.started_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Marks the job completed on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`JobTransitionError::NotParticipant`] unless `actor` posted
    /// or took the job, or [`JobTransitionError::Finished`] when it already
    /// ended.
    pub fn complete(&mut self, actor: AgentId, clock: &impl Clock) -> Result<(), JobTransitionError> {
        if !self.involves(actor) {
            return Err(JobTransitionError::NotParticipant);
        }
        if self.status.is_finished() {
            return Err(JobTransitionError::Finished(self.status));
        }
        let now = clock.utc();
        self.status = JobStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Withdraws the job on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`JobTransitionError::NotPoster`] unless `actor` posted the
    /// job, or [`JobTransitionError::Finished`] when it already ended.
    pub fn cancel(&mut self, actor: AgentId, clock: &impl Clock) -> Result<(), JobTransitionError> {
        if actor != self.posted_by {
            return Err(JobTransitionError::NotPoster);
        }
        if self.status.is_finished() {
            return Err(JobTransitionError::Finished(self.status));
        }
        self.status = JobStatus::Cancelled;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns `true` when `agent` posted or took the job.
    #[must_use]
    pub fn involves(&self, agent: AgentId) -> bool {
        self.posted_by == agent || self.taken_by == Some(agent)
    }

    /// Returns `true` when the job passes `filter`.
    #[must_use]
    pub fn matches(&self, filter: &JobFilter) -> bool {
        filter.status.is_none_or(|status| status == self.status)
            && filter
                .category
                .is_none_or(|category| category == self.posting.category())
            && filter
                .job_type
                .is_none_or(|job_type| job_type == self.posting.job_type())
    }

    /// Returns `true` when the job is on `agent`'s side of `role`.
    #[must_use]
    pub fn belongs_to(&self, agent: AgentId, role: JobRole) -> bool {
        match role {
            JobRole::Posted => self.posted_by == agent,
            JobRole::Taken => self.taken_by == Some(agent),
            JobRole::All => self.involves(agent),
        }
    }
}
