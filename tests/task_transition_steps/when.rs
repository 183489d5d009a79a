//! When steps for task transition BDD scenarios.

use super::world::{TransitionWorld, run_async, task_id_by_title};
use rstest_bdd_macros::when;

#[when(r#"the to-do view completes "{title}""#)]
fn todo_view_completes(world: &mut TransitionWorld, title: String) -> Result<(), eyre::Report> {
    let view = world.todo_view()?;
    let id = task_id_by_title(view, &title)?;
    let result = run_async(view.complete(&id));
    world.last_transition_result = Some(result);
    Ok(())
}

#[when(r#"the to-do view edits "{title}" to a blank title and completes it"#)]
fn todo_view_completes_with_blank_title(
    world: &mut TransitionWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let view = world.todo_view()?;
    let id = task_id_by_title(view, &title)?;
    let result = run_async(view.edit_then_complete(&id, "", ""));
    world.last_transition_result = Some(result);
    Ok(())
}

#[when(r#"the completed view reopens "{title}""#)]
fn completed_view_reopens(world: &mut TransitionWorld, title: String) -> Result<(), eyre::Report> {
    let view = world.completed_view()?;
    let id = task_id_by_title(view, &title)?;
    let result = run_async(view.reopen(&id));
    world.last_transition_result = Some(result);
    Ok(())
}

#[when("the completed view is activated")]
fn completed_view_activated(world: &mut TransitionWorld) -> Result<(), eyre::Report> {
    world
        .completed_view()?
        .activate()
        .map_err(|err| eyre::eyre!("activation failed: {err}"))?;
    Ok(())
}

#[when("the to-do view is activated")]
fn todo_view_activated(world: &mut TransitionWorld) -> Result<(), eyre::Report> {
    world
        .todo_view()?
        .activate()
        .map_err(|err| eyre::eyre!("activation failed: {err}"))?;
    Ok(())
}
