//! When steps for purchase BDD scenarios.

use super::world::PurchaseWorld;
use crate::test_helpers::run_async;
use clawos::marketplace::services::ReviewRequest;
use rstest_bdd_macros::when;

#[when(r#""{buyer}" buys "{skill}" with transaction "{tx}""#)]
fn buys(
    world: &mut PurchaseWorld,
    buyer: String,
    skill: String,
    tx: String,
) -> Result<(), eyre::Report> {
    world.last_purchase = Some(world.buy(&buyer, &skill, &tx)?);
    Ok(())
}

#[when(r#""{reviewer}" reviews "{skill}" with {stars:i64} stars"#)]
fn reviews(
    world: &mut PurchaseWorld,
    reviewer: String,
    skill: String,
    stars: i64,
) -> Result<(), eyre::Report> {
    let agent = world.agent(&reviewer)?;
    let request = ReviewRequest {
        skill_id: world.skill(&skill)?.id(),
        rating: stars,
        comment: Some(format!("{stars} stars from {reviewer}")),
    };
    world.last_review = Some(run_async(world.state.marketplace.review(&agent, request)));
    Ok(())
}
