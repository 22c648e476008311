//! Then steps for agent registration BDD scenarios.

use super::world::RegistrationWorld;
use crate::test_helpers::run_async;
use clawos::agent::{
    domain::{AgentDomainError, AgentStatus},
    ports::AgentRepositoryError,
    services::AgentServiceError,
};
use clawos::pagination::PageRequest;
use rstest_bdd_macros::then;

#[then(r#"the agent is claimed by "{handle}""#)]
fn agent_is_claimed_by(world: &RegistrationWorld, handle: String) -> Result<(), eyre::Report> {
    let result = world
        .last_claim_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing claim result in scenario world"))?;
    let agent = result
        .as_ref()
        .map_err(|err| eyre::eyre!("claim failed: {err}"))?;
    if agent.status() != AgentStatus::Claimed {
        return Err(eyre::eyre!("expected claimed status, got {:?}", agent.status()));
    }
    let owner = agent.claim().map(|claim| claim.x_handle());
    if owner != Some(handle.as_str()) {
        return Err(eyre::eyre!("expected owner {handle}, got {owner:?}"));
    }
    Ok(())
}

#[then("the directory lists {count:u64} agents")]
fn directory_lists(world: &RegistrationWorld, count: u64) -> Result<(), eyre::Report> {
    let page = run_async(world.state.agents.list_claimed(None, PageRequest::first(20)))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    if page.total != count {
        return Err(eyre::eyre!("expected {count} listed agents, found {}", page.total));
    }
    Ok(())
}

#[then("registration fails because the name is taken")]
fn registration_fails_name_taken(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_register_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing registration result in scenario world"))?;
    if !matches!(
        result,
        Err(AgentServiceError::Repository(
            AgentRepositoryError::DuplicateName(_)
        ))
    ) {
        return Err(eyre::eyre!("expected duplicate name error, got {result:?}"));
    }
    Ok(())
}

#[then("claiming fails because the agent is already claimed")]
fn claiming_fails_already_claimed(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_claim_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing claim result in scenario world"))?;
    if !matches!(
        result,
        Err(AgentServiceError::Domain(AgentDomainError::AlreadyClaimed))
    ) {
        return Err(eyre::eyre!("expected already-claimed error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the issued API key authenticates as "{name}""#)]
fn issued_key_authenticates(world: &RegistrationWorld, name: String) -> Result<(), eyre::Report> {
    let key = world.registered()?.api_key.expose().to_owned();
    let agent = run_async(world.state.agents.authenticate(&key))
        .map_err(|err| eyre::eyre!("authentication failed: {err}"))?;
    if agent.name().as_str() != name {
        return Err(eyre::eyre!("authenticated as {}", agent.name().as_str()));
    }
    Ok(())
}

#[then(r#"the key "{key}" is refused"#)]
fn key_is_refused(world: &RegistrationWorld, key: String) -> Result<(), eyre::Report> {
    let result = run_async(world.state.agents.authenticate(&key));
    if !matches!(result, Err(AgentServiceError::Unauthenticated)) {
        return Err(eyre::eyre!("expected the key to be refused, got {result:?}"));
    }
    Ok(())
}
