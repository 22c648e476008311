//! When steps for job board BDD scenarios.

use super::world::{JobAction, JobBoardWorld};
use rstest_bdd_macros::when;

#[when(r#""{name}" accepts the job"#)]
fn accepts(world: &mut JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    world.last_result = Some(world.act(&name, JobAction::Accept)?);
    Ok(())
}

#[when(r#""{name}" completes the job"#)]
fn completes(world: &mut JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    world.last_result = Some(world.act(&name, JobAction::Complete)?);
    Ok(())
}

#[when(r#""{name}" cancels the job"#)]
fn cancels(world: &mut JobBoardWorld, name: String) -> Result<(), eyre::Report> {
    world.last_result = Some(world.act(&name, JobAction::Cancel)?);
    Ok(())
}
