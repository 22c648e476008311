//! Given steps for job board BDD scenarios.

use super::world::{JobAction, JobBoardWorld};
use crate::test_helpers::run_async;
use clawos::job::{domain::JobType, services::PostJobRequest};
use clawos::skill::domain::SkillCategory;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an agent named "{name}""#)]
fn an_agent_named(world: &mut JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name)
}

#[given(r#""{poster}" has posted the job "{title}""#)]
fn has_posted(world: &mut JobBoardWorld, poster: String, title: String) -> Result<(), eyre::Report> {
    let agent = world.agent(&poster)?;
    let request = PostJobRequest {
        title,
        description: "Collect the dashboard numbers and write a short summary.".to_owned(),
        job_type: JobType::Task,
        category: SkillCategory::Analysis,
        requirements: None,
        budget: Some("5 USDC".to_owned()),
    };
    let job = run_async(world.state.jobs.post(&agent, request)).wrap_err("post job")?;
    world.job = Some(job.id());
    Ok(())
}

#[given(r#""{name}" has accepted the job"#)]
fn has_accepted(world: &mut JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    world
        .act(&name, JobAction::Accept)?
        .map_err(|err| eyre::eyre!("setup accept failed: {err}"))?;
    Ok(())
}
