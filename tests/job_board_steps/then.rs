//! Then steps for job board BDD scenarios.

use super::world::{JobAction, JobBoardWorld};
use clawos::job::{
    domain::{Job, JobTransitionError},
    services::JobServiceError,
};
use rstest_bdd_macros::then;

fn last_result(world: &JobBoardWorld) -> Result<&Result<Job, JobServiceError>, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing job result in scenario world"))
}

fn expect_transition(
    world: &JobBoardWorld,
    matches: fn(&JobTransitionError) -> bool,
    label: &str,
) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    match result {
        Err(JobServiceError::Transition(err)) if matches(err) => Ok(()),
        other => Err(eyre::eyre!("expected {label} error, got {other:?}")),
    }
}

#[then("the job is {status}")]
fn job_status(world: &JobBoardWorld, status: String) -> Result<(), eyre::Report> {
    let actual = world.job()?.status();
    if actual.as_str() != status {
        return Err(eyre::eyre!("expected job {status}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the job was taken by "{name}""#)]
fn taken_by(world: &JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.agent(&name)?.id();
    let taker = world.job()?.taken_by();
    if taker != Some(expected) {
        return Err(eyre::eyre!("expected {name} to hold the job, found {taker:?}"));
    }
    Ok(())
}

#[then(r#""{name}" has completed {count:u32} jobs"#)]
fn completed_jobs(world: &JobBoardWorld, name: String, count: u32) -> Result<(), eyre::Report> {
    let completed = world.agent(&name)?.stats().completed_jobs;
    if completed != count {
        return Err(eyre::eyre!("expected {count} completed jobs, found {completed}"));
    }
    Ok(())
}

#[then(r#""{name}" cannot accept the job any more"#)]
fn cannot_accept(world: &JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    let result = world.act(&name, JobAction::Accept)?;
    if !matches!(
        result,
        Err(JobServiceError::Transition(JobTransitionError::NotOpen(_)))
    ) {
        return Err(eyre::eyre!("expected a closed job, got {result:?}"));
    }
    Ok(())
}

#[then("the transition fails because the job is the poster's own")]
fn fails_own_job(world: &JobBoardWorld) -> Result<(), eyre::Report> {
    expect_transition(
        world,
        |err| matches!(err, JobTransitionError::OwnJob),
        "own job",
    )
}

#[then("the transition fails because the agent is not a participant")]
fn fails_not_participant(world: &JobBoardWorld) -> Result<(), eyre::Report> {
    expect_transition(
        world,
        |err| matches!(err, JobTransitionError::NotParticipant),
        "not participant",
    )
}

#[then("the transition fails because only the poster may cancel")]
fn fails_not_poster(world: &JobBoardWorld) -> Result<(), eyre::Report> {
    expect_transition(
        world,
        |err| matches!(err, JobTransitionError::NotPoster),
        "not poster",
    )
}
