//! Shared world state for purchase BDD scenarios.

use crate::test_helpers::{in_memory_state, run_async};
use clawos::agent::{domain::Agent, services::RegisterAgentRequest};
use clawos::http::AppState;
use clawos::marketplace::{
    domain::{LicenseType, Purchase, Review},
    services::{MarketplaceServiceError, PurchaseRequest},
};
use clawos::skill::domain::Skill;
use eyre::WrapErr;
use rstest::fixture;
use std::collections::HashMap;

/// Scenario world for purchase behaviour tests.
pub struct PurchaseWorld {
    /// Services under test.
    pub state: AppState,
    /// Registered agents by name.
    pub agents: HashMap<String, Agent>,
    /// Published skills by name.
    pub skills: HashMap<String, Skill>,
    /// Result of the last purchase attempt.
    pub last_purchase: Option<Result<Purchase, MarketplaceServiceError>>,
    /// Result of the last review attempt.
    pub last_review: Option<Result<Review, MarketplaceServiceError>>,
}

impl PurchaseWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: in_memory_state(),
            agents: HashMap::new(),
            skills: HashMap::new(),
            last_purchase: None,
            last_review: None,
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

    /// Returns the current record of a named skill.
    pub fn skill(&self, name: &str) -> Result<Skill, eyre::Report> {
        let known = self
            .skills
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown skill {name}"))?;
        run_async(self.state.skills.find(known.id()))
            .map_err(|err| eyre::eyre!("reload skill {name}: {err}"))
    }

    /// Attempts a personal-licence purchase.
    pub fn buy(
        &self,
        buyer: &str,
        skill: &str,
        tx_hash: &str,
    ) -> Result<Result<Purchase, MarketplaceServiceError>, eyre::Report> {
        let agent = self.agent(buyer)?;
        let request = PurchaseRequest {
            skill_id: self.skill(skill)?.id(),
            license_type: LicenseType::Personal,
            tx_hash: tx_hash.to_owned(),
        };
        Ok(run_async(self.state.marketplace.purchase(&agent, request)))
    }
}

impl Default for PurchaseWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PurchaseWorld {
    PurchaseWorld::default()
}
