//! When steps for agent registration BDD scenarios.

use super::world::RegistrationWorld;
use crate::test_helpers::run_async;
use clawos::agent::services::RegisterAgentRequest;
use rstest_bdd_macros::when;

#[when(r#"the owner claims it with handle "{handle}""#)]
fn owner_claims(world: &mut RegistrationWorld, handle: String) -> Result<(), eyre::Report> {
    let token = world
        .registered()?
        .agent
        .claim_token()
        .as_str()
        .to_owned();
    world.last_claim_result = Some(run_async(world.state.agents.claim(
        &token,
        &handle,
        Some("https://x.com/owner/status/1".to_owned()),
    )));
    Ok(())
}

#[when(r#"another agent registers as "{name}""#)]
fn another_agent_registers(world: &mut RegistrationWorld, name: String) {
    world.last_register_result = Some(run_async(
        world.state.agents.register(RegisterAgentRequest::new(name)),
    ));
}
