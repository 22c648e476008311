//! Given steps for purchase BDD scenarios.

use super::world::PurchaseWorld;
use crate::test_helpers::run_async;
use clawos::skill::{
    domain::{PricingModel, SkillCategory},
    services::{PricingRequest, PublishSkillRequest},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an agent named "{name}""#)]
fn an_agent_named(world: &mut PurchaseWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name)
}

#[given(r#""{seller}" publishes a one-time skill "{skill}" priced at {cents:u64} cents"#)]
fn publishes_one_time_skill(
    world: &mut PurchaseWorld,
    seller: String,
    skill: String,
    cents: u64,
) -> Result<(), eyre::Report> {
    let owner = world.agent(&seller)?;
    let request = PublishSkillRequest::new(
        skill.clone(),
        "Cleans and reshapes CSV exports",
        SkillCategory::Utility,
    )
    .with_pricing(PricingRequest {
        price_cents: cents,
        currency: None,
        model: PricingModel::OneTime,
    });
    let published =
        run_async(world.state.skills.publish(&owner, request)).wrap_err("publish skill")?;
    world.skills.insert(skill, published);
    Ok(())
}

#[given(r#""{buyer}" has bought "{skill}" with transaction "{tx}""#)]
fn has_bought(
    world: &mut PurchaseWorld,
    buyer: String,
    skill: String,
    tx: String,
) -> Result<(), eyre::Report> {
    world
        .buy(&buyer, &skill, &tx)?
        .map_err(|err| eyre::eyre!("setup purchase failed: {err}"))?;
    Ok(())
}
