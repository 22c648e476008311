//! Behaviour tests for the job board lifecycle.

mod job_board_steps;
mod test_helpers;

use job_board_steps::world::{JobBoardWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(path = "tests/features/job_board.feature", name = "Take an open job")]
#[tokio::test(flavor = "multi_thread")]
async fn take_open_job(world: JobBoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/job_board.feature",
    name = "Posters cannot take their own job"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_own_job(world: JobBoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/job_board.feature",
    name = "Outsiders cannot complete a job"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_outsider_completion(world: JobBoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/job_board.feature",
    name = "Completing a job credits the taker"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completion_credits_taker(world: JobBoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/job_board.feature",
    name = "The poster cancels an open job"
)]
#[tokio::test(flavor = "multi_thread")]
async fn poster_cancels(world: JobBoardWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/job_board.feature", name = "Only the poster may cancel")]
#[tokio::test(flavor = "multi_thread")]
async fn only_poster_cancels(world: JobBoardWorld) {
    let _ = world;
}
