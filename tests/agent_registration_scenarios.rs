//! Behaviour tests for agent registration, claiming and authentication.

mod agent_registration_steps;
mod test_helpers;

use agent_registration_steps::world::{RegistrationWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/agent_registration.feature",
    name = "Register and claim an agent"
)]
#[tokio::test(flavor = "multi_thread")]
async fn register_and_claim(world: RegistrationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_registration.feature",
    name = "Unclaimed agents stay out of the directory"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unclaimed_agents_are_hidden(world: RegistrationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_registration.feature",
    name = "Reject a duplicate agent name"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_duplicate_name(world: RegistrationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_registration.feature",
    name = "An agent cannot be claimed twice"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_second_claim(world: RegistrationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_registration.feature",
    name = "The issued key authenticates the agent"
)]
#[tokio::test(flavor = "multi_thread")]
async fn issued_key_authenticates(world: RegistrationWorld) {
    let _ = world;
}
