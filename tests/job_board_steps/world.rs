//! Shared world state for job board BDD scenarios.

use crate::test_helpers::{in_memory_state, run_async};
use clawos::agent::{domain::Agent, services::RegisterAgentRequest};
use clawos::http::AppState;
use clawos::job::{
    domain::{Job, JobId},
    services::JobServiceError,
};
use eyre::WrapErr;
use rstest::fixture;
use std::collections::HashMap;

/// Lifecycle action exercised by a step.
#[derive(Debug, Clone, Copy)]
pub enum JobAction {
    /// Take the job.
    Accept,
    /// Finish the job.
    Complete,
    /// Withdraw the job.
    Cancel,
}

/// Scenario world for job board behaviour tests.
pub struct JobBoardWorld {
    /// Services under test.
    pub state: AppState,
    /// Registered agents by name.
    pub agents: HashMap<String, Agent>,
    /// The job posted in the background.
    pub job: Option<JobId>,
    /// Result of the last lifecycle call.
    pub last_result: Option<Result<Job, JobServiceError>>,
}

impl JobBoardWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: in_memory_state(),
            agents: HashMap::new(),
            job: None,
            last_result: None,
        }
    }

    /// Registers an agent and remembers it by name.
    pub fn register(&mut self, name: &str) -> Result<(), eyre::Report> {
        let registered = run_async(self.state.agents.register(RegisterAgentRequest::new(name)))
            .wrap_err("register agent for scenario")?;
        self.agents.insert(name.to_owned(), registered.agent);
        Ok(())
    }

    /// Returns the current record of a named agent.
    pub fn agent(&self, name: &str) -> Result<Agent, eyre::Report> {
        let known = self
            .agents
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown agent {name}"))?;
        run_async(self.state.agents.require(known.id()))
            .map_err(|err| eyre::eyre!("reload agent {name}: {err}"))
    }

    /// Returns the identifier of the posted job.
    pub fn job_id(&self) -> Result<JobId, eyre::Report> {
        self.job
            .ok_or_else(|| eyre::eyre!("no job posted in scenario world"))
    }

    /// Returns the stored state of the posted job.
    pub fn job(&self) -> Result<Job, eyre::Report> {
        run_async(self.state.jobs.get(self.job_id()?))
            .map_err(|err| eyre::eyre!("load job: {err}"))
    }

    /// Runs a lifecycle action as the named agent.
    pub fn act(
        &self,
        name: &str,
        action: JobAction,
    ) -> Result<Result<Job, JobServiceError>, eyre::Report> {
        let agent = self.agent(name)?;
        let id = self.job_id()?;
        let jobs = &self.state.jobs;
        Ok(match action {
            JobAction::Accept => run_async(jobs.accept(&agent, id)),
            JobAction::Complete => run_async(jobs.complete(&agent, id)),
            JobAction::Cancel => run_async(jobs.cancel(&agent, id)),
        })
    }
}

impl Default for JobBoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> JobBoardWorld {
    JobBoardWorld::default()
}
