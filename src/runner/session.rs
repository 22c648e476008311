//! Registration and heartbeat loop body for one agent.

use super::api::{
    AgentStatusReport, JobPreferences, MarketplaceApi, OpenJob, PublishedSkill, Registration,
    RunnerError,
};
use super::state::{RunnerState, StateError, StateStore};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const RECENT_MESSAGES: u32 = 10;
const OPEN_JOBS: u32 = 10;
const HEARTBEAT_LEVEL: &str = "DEBUG";
const GREETINGS: [&str; 4] = [
    "Hello! I'm {name}, ready to help.",
    "Hi everyone! {name} is online.",
    "Greetings! {name} reporting for duty.",
    "Hey! {name} just joined the network.",
];

/// Failure starting or driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// API call failed.
    #[error(transparent)]
    Api(#[from] RunnerError),
    /// Saved credentials could not be read or written.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Behaviour switches for the heartbeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Accept the first open job posted by someone else.
    pub auto_accept: bool,
    /// Filter for the job scan.
    pub jobs: JobPreferences,
}

/// Outcome of one heartbeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeartbeatReport {
    /// Messages in the recent chat window.
    pub new_messages: usize,
    /// Open jobs seen.
    pub open_jobs: usize,
    /// Job accepted on this beat.
    pub accepted: Option<OpenJob>,
}

/// A registered agent talking to the API.
pub struct AgentSession<A: ?Sized> {
    api: Arc<A>,
    state: RunnerState,
    options: SessionOptions,
}

impl<A> AgentSession<A>
where
    A: MarketplaceApi + ?Sized,
{
    /// Resumes from saved credentials or registers a new agent.
    ///
    /// The second element holds the registration when one happened, so
    /// the caller can show the claim link.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when registration fails or the state file
    /// cannot be used.
    pub async fn start(
        api: Arc<A>,
        store: &StateStore,
        name: Option<String>,
        description: &str,
        force_register: bool,
        options: SessionOptions,
    ) -> Result<(Self, Option<Registration>), SessionError> {
        let saved = if force_register { None } else { store.load()? };
        if let Some(state) = saved {
            debug!(agent = %state.name, "resuming saved agent");
            return Ok((Self { api, state, options }, None));
        }

        let now = Utc::now();
        let chosen = name.unwrap_or_else(|| format!("agent-{}", now.timestamp_millis()));
        info!(name = %chosen, "registering new agent");
        let registration = api.register(&chosen, description).await?;
        let state = RunnerState {
            api_key: registration.api_key.clone(),
            agent_id: registration.agent_id.clone(),
            name: registration.name.clone(),
            registered_at: now,
        };
        store.save(&state)?;
        info!(agent_id = %state.agent_id, "agent registered");
        Ok((Self { api, state, options }, Some(registration)))
    }

    /// Returns the credentials in use.
    #[must_use]
    pub const fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Fetches the claim status.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the API call fails.
    pub async fn status(&self) -> Result<AgentStatusReport, RunnerError> {
        self.api.status(&self.state.api_key).await
    }

    /// Posts one of the canned greetings to the chat room.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the API call fails.
    pub async fn greet(&self) -> Result<(), RunnerError> {
        let template = GREETINGS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Hello! I'm {name}, ready to help.");
        let greeting = template.replace("{name}", &self.state.name);
        self.api.post_chat(&self.state.api_key, &greeting).await?;
        info!("sent greeting");
        Ok(())
    }

    /// Publishes each listing in `skills`, returning the accepted ones.
    ///
    /// A rejected listing is logged and skipped.
    pub async fn publish_skills(&self, skills: &[Value]) -> Vec<PublishedSkill> {
        let mut published = Vec::with_capacity(skills.len());
        for skill in skills {
            let name = skill.get("name").and_then(Value::as_str).unwrap_or("unnamed");
            info!(name, "uploading skill");
            match self.api.publish_skill(&self.state.api_key, skill).await {
                Ok(listing) => {
                    info!(skill_id = %listing.id, name = %listing.name, "skill uploaded");
                    published.push(listing);
                }
                Err(err) => warn!(name, error = %err, "skill upload failed"),
            }
        }
        published
    }

    /// Reads recent chat, scans open jobs, optionally accepts one and logs
    /// the beat.
    ///
    /// A failed acceptance is logged and leaves `accepted` empty.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when reading chat, listing jobs or writing
    /// the log entry fails.
    pub async fn heartbeat(&self) -> Result<HeartbeatReport, RunnerError> {
        let key = self.state.api_key.as_str();
        let new_messages = self.api.recent_message_count(key, RECENT_MESSAGES).await?;
        let jobs = self
            .api
            .open_jobs(key, self.options.jobs.clone(), OPEN_JOBS)
            .await?;

        let metadata = json!({ "newMessages": new_messages, "openJobs": jobs.len() });
        self.api
            .post_log(key, HEARTBEAT_LEVEL, "Heartbeat", &metadata)
            .await?;

        let accepted = if self.options.auto_accept {
            self.accept_first(&jobs).await
        } else {
            None
        };
        Ok(HeartbeatReport {
            new_messages,
            open_jobs: jobs.len(),
            accepted,
        })
    }

    async fn accept_first(&self, jobs: &[OpenJob]) -> Option<OpenJob> {
        let candidate = jobs
            .iter()
            .find(|job| job.posted_by != self.state.agent_id)?;
        match self.api.accept_job(&self.state.api_key, &candidate.id).await {
            Ok(()) => {
                info!(job_id = %candidate.id, title = %candidate.title, "job accepted");
                Some(candidate.clone())
            }
            Err(err) => {
                warn!(job_id = %candidate.id, error = %err, "could not accept job");
                None
            }
        }
    }
}
