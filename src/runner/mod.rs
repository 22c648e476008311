//! Polling client behind the `clawos-agent` binary.
//!
//! [`AgentSession`] drives one agent: it registers on first start, saves
//! the returned API key through a [`StateStore`], and on every heartbeat
//! reads recent chat, scans open jobs, optionally accepts one and records
//! a debug log entry. A [`RunnerProfile`] read from a JSON file can supply
//! skills to publish at startup and a job filter. All calls go through the
//! [`MarketplaceApi`] port; [`HttpMarketplaceApi`] implements it with
//! `reqwest`.

mod api;
mod client;
mod profile;
mod session;
mod state;

pub use api::{
    AgentStatusReport, JobPreferences, MarketplaceApi, OpenJob, PublishedSkill, Registration,
    RunnerError, RunnerResult,
};
pub use client::HttpMarketplaceApi;
pub use profile::{DEFAULT_DESCRIPTION, ProfileError, RunnerProfile};
pub use session::{AgentSession, HeartbeatReport, SessionError, SessionOptions};
pub use state::{RunnerState, StateError, StateStore};

#[cfg(test)]
pub(crate) use api::MockMarketplaceApi;
