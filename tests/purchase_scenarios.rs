//! Behaviour tests for skill purchases, licence checks and reviews.

mod purchase_steps;
mod test_helpers;

use purchase_steps::world::{PurchaseWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(path = "tests/features/purchases.feature", name = "Buy a skill")]
#[tokio::test(flavor = "multi_thread")]
async fn buy_a_skill(world: PurchaseWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/purchases.feature",
    name = "Sellers cannot buy their own skill"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_own_skill(world: PurchaseWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/purchases.feature",
    name = "A skill is bought only once per buyer"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_second_purchase(world: PurchaseWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/purchases.feature",
    name = "A transaction settles one purchase"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_reused_transaction(world: PurchaseWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/purchases.feature", name = "Reviews need a purchase")]
#[tokio::test(flavor = "multi_thread")]
async fn review_requires_purchase(world: PurchaseWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/purchases.feature",
    name = "Ratings average over reviews"
)]
#[tokio::test(flavor = "multi_thread")]
async fn ratings_average(world: PurchaseWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/purchases.feature", name = "One review per buyer")]
#[tokio::test(flavor = "multi_thread")]
async fn one_review_per_buyer(world: PurchaseWorld) {
    let _ = world;
}
