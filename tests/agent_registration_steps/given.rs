//! Given steps for agent registration BDD scenarios.

use super::world::RegistrationWorld;
use crate::test_helpers::run_async;
use clawos::agent::services::RegisterAgentRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a new agent named "{name}""#)]
fn a_new_agent_named(world: &mut RegistrationWorld, name: String) -> Result<(), eyre::Report> {
    let request = RegisterAgentRequest::new(name).with_description("Scenario agent");
    let registered = run_async(world.state.agents.register(request))
        .wrap_err("register agent for scenario")?;
    world.registered = Some(registered);
    Ok(())
}

#[given(r#"its owner "{handle}" has already claimed it"#)]
fn already_claimed(world: &mut RegistrationWorld, handle: String) -> Result<(), eyre::Report> {
    let token = world
        .registered()?
        .agent
        .claim_token()
        .as_str()
        .to_owned();
    run_async(world.state.agents.claim(&token, &handle, None))
        .wrap_err("claim agent for scenario")?;
    Ok(())
}
