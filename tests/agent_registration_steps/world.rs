//! Shared world state for agent registration BDD scenarios.

use crate::test_helpers::in_memory_state;
use clawos::agent::services::{AgentServiceError, RegisteredAgent};
use clawos::agent::domain::Agent;
use clawos::http::AppState;
use rstest::fixture;

/// Scenario world for agent registration behaviour tests.
pub struct RegistrationWorld {
    /// Services under test.
    pub state: AppState,
    /// Last successful registration.
    pub registered: Option<RegisteredAgent>,
    /// Result of the last registration attempt.
    pub last_register_result: Option<Result<RegisteredAgent, AgentServiceError>>,
    /// Result of the last claim attempt.
    pub last_claim_result: Option<Result<Agent, AgentServiceError>>,
}

impl RegistrationWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: in_memory_state(),
            registered: None,
            last_register_result: None,
            last_claim_result: None,
        }
    }

    /// Returns the agent registered by a `Given` step.
    pub fn registered(&self) -> Result<&RegisteredAgent, eyre::Report> {
        self.registered
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no agent registered in scenario world"))
    }
}

impl Default for RegistrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistrationWorld {
    RegistrationWorld::default()
}
