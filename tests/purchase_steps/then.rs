//! Then steps for purchase BDD scenarios.

use super::world::PurchaseWorld;
use crate::test_helpers::run_async;
use clawos::marketplace::{
    domain::{Purchase, PurchaseStatus, Review},
    ports::{PurchaseRepositoryError, ReviewRepositoryError},
    services::{MarketplaceServiceError, PurchaseVerification},
};
use rstest_bdd_macros::then;

fn purchase_result(
    world: &PurchaseWorld,
) -> Result<&Result<Purchase, MarketplaceServiceError>, eyre::Report> {
    world
        .last_purchase
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing purchase result in scenario world"))
}

fn review_result(
    world: &PurchaseWorld,
) -> Result<&Result<Review, MarketplaceServiceError>, eyre::Report> {
    world
        .last_review
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing review result in scenario world"))
}

fn verify(world: &PurchaseWorld, buyer: &str, skill: &str) -> Result<bool, eyre::Report> {
    let buyer_id = world.agent(buyer)?.id();
    let skill_id = world.skill(skill)?.id();
    let verification = run_async(world.state.marketplace.verify(buyer_id, skill_id))
        .map_err(|err| eyre::eyre!("verify failed: {err}"))?;
    Ok(matches!(verification, PurchaseVerification::Valid(_)))
}

#[then("the purchase is active")]
fn purchase_is_active(world: &PurchaseWorld) -> Result<(), eyre::Report> {
    let purchase = purchase_result(world)?
        .as_ref()
        .map_err(|err| eyre::eyre!("purchase failed: {err}"))?;
    if purchase.status() != PurchaseStatus::Active {
        return Err(eyre::eyre!("expected active purchase, got {:?}", purchase.status()));
    }
    Ok(())
}

#[then(r#""{skill}" has {count:u32} downloads"#)]
fn skill_downloads(world: &PurchaseWorld, skill: String, count: u32) -> Result<(), eyre::Report> {
    let downloads = world.skill(&skill)?.metrics().download_count;
    if downloads != count {
        return Err(eyre::eyre!("expected {count} downloads, found {downloads}"));
    }
    Ok(())
}

#[then(r#""{name}" has {count:u32} sales"#)]
fn agent_sales(world: &PurchaseWorld, name: String, count: u32) -> Result<(), eyre::Report> {
    let sales = world.agent(&name)?.stats().total_sales;
    if sales != count {
        return Err(eyre::eyre!("expected {count} sales, found {sales}"));
    }
    Ok(())
}

#[then(r#""{name}" has {count:u32} purchases"#)]
fn agent_purchases(world: &PurchaseWorld, name: String, count: u32) -> Result<(), eyre::Report> {
    let purchases = world.agent(&name)?.stats().total_purchases;
    if purchases != count {
        return Err(eyre::eyre!("expected {count} purchases, found {purchases}"));
    }
    Ok(())
}

#[then(r#""{buyer}" may use "{skill}""#)]
fn may_use(world: &PurchaseWorld, buyer: String, skill: String) -> Result<(), eyre::Report> {
    if !verify(world, &buyer, &skill)? {
        return Err(eyre::eyre!("expected {buyer} to hold a valid licence"));
    }
    Ok(())
}

#[then(r#""{buyer}" may not use "{skill}""#)]
fn may_not_use(world: &PurchaseWorld, buyer: String, skill: String) -> Result<(), eyre::Report> {
    if verify(world, &buyer, &skill)? {
        return Err(eyre::eyre!("expected {buyer} to be denied"));
    }
    Ok(())
}

#[then("the purchase fails because the buyer owns the skill")]
fn fails_own_skill(world: &PurchaseWorld) -> Result<(), eyre::Report> {
    let result = purchase_result(world)?;
    if !matches!(result, Err(MarketplaceServiceError::OwnSkill)) {
        return Err(eyre::eyre!("expected own-skill error, got {result:?}"));
    }
    Ok(())
}

#[then("the purchase fails because it is already owned")]
fn fails_already_owned(world: &PurchaseWorld) -> Result<(), eyre::Report> {
    let result = purchase_result(world)?;
    if !matches!(result, Err(MarketplaceServiceError::AlreadyOwned(_))) {
        return Err(eyre::eyre!("expected already-owned error, got {result:?}"));
    }
    Ok(())
}

#[then("the purchase fails because the transaction was already processed")]
fn fails_duplicate_tx(world: &PurchaseWorld) -> Result<(), eyre::Report> {
    let result = purchase_result(world)?;
    if !matches!(
        result,
        Err(MarketplaceServiceError::Purchases(
            PurchaseRepositoryError::DuplicateTxHash(_)
        ))
    ) {
        return Err(eyre::eyre!("expected duplicate transaction error, got {result:?}"));
    }
    Ok(())
}

#[then("the review fails because no purchase was made")]
fn review_needs_purchase(world: &PurchaseWorld) -> Result<(), eyre::Report> {
    let result = review_result(world)?;
    if !matches!(result, Err(MarketplaceServiceError::PurchaseRequired(_))) {
        return Err(eyre::eyre!("expected purchase-required error, got {result:?}"));
    }
    Ok(())
}

#[then("the review fails because it was already written")]
fn review_is_duplicate(world: &PurchaseWorld) -> Result<(), eyre::Report> {
    let result = review_result(world)?;
    if !matches!(
        result,
        Err(MarketplaceServiceError::Reviews(
            ReviewRepositoryError::DuplicateReview { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected duplicate review error, got {result:?}"));
    }
    Ok(())
}

#[then(r#""{skill}" is rated {rating} from {count:u32} reviews"#)]
fn skill_rating(
    world: &PurchaseWorld,
    skill: String,
    rating: String,
    count: u32,
) -> Result<(), eyre::Report> {
    let metrics = *world.skill(&skill)?.metrics();
    let shown = format!("{:.2}", metrics.rating);
    if shown != rating || metrics.review_count != count {
        return Err(eyre::eyre!(
            "expected {rating} from {count} reviews, found {shown} from {}",
            metrics.review_count
        ));
    }
    Ok(())
}
