//! Then steps for task transition BDD scenarios.

use super::world::TransitionWorld;
use rstest_bdd_macros::then;
use tasksync::{
    task::{
        domain::{Task, TaskDomainError, TaskStatus},
        services::{CacheError, TransitionError},
    },
    view::{domain::ViewKey, ports::StateRelay, services::SessionError},
};

fn titles<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<String> {
    tasks.map(|task| task.title().to_owned()).collect()
}

#[then(r#"the completed view lists "{title}""#)]
fn completed_view_lists(world: &mut TransitionWorld, title: String) -> Result<(), eyre::Report> {
    let listed = titles(world.completed_view()?.cache().completed().iter());
    if !listed.contains(&title) {
        return Err(eyre::eyre!(
            "expected {title:?} in the completed view, found {listed:?}"
        ));
    }
    Ok(())
}

#[then(r#"the to-do view lists only "{title}""#)]
fn todo_view_lists_only(world: &mut TransitionWorld, title: String) -> Result<(), eyre::Report> {
    let listed = titles(world.todo_view()?.cache().active().iter());
    if listed != [title.clone()] {
        return Err(eyre::eyre!(
            "expected only {title:?} in the to-do view, found {listed:?}"
        ));
    }
    Ok(())
}

#[then("the completed view is empty")]
fn completed_view_is_empty(world: &mut TransitionWorld) -> Result<(), eyre::Report> {
    let cache = world.completed_view()?.cache();
    if !cache.completed().is_empty() {
        return Err(eyre::eyre!(
            "expected no completed tasks, found {:?}",
            titles(cache.completed().iter())
        ));
    }
    Ok(())
}

#[then(r#"the task service records "{title}" as completed"#)]
fn service_records_completed(world: &TransitionWorld, title: String) -> Result<(), eyre::Report> {
    let stored = world
        .service
        .stored(TaskStatus::Completed)
        .map_err(|err| eyre::eyre!("read stored tasks: {err}"))?;
    if !stored.iter().any(|task| task.title() == title) {
        return Err(eyre::eyre!(
            "expected the task service to hold {title:?} as completed"
        ));
    }
    Ok(())
}

#[then("the transition is reported as not persisted")]
fn transition_not_persisted(world: &TransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result in scenario world"))?;
    let Err(SessionError::Transition(err)) = result else {
        return Err(eyre::eyre!("expected a transition failure, got {result:?}"));
    };
    if err.committed().is_none() || !err.is_retryable() {
        return Err(eyre::eyre!(
            "expected a committed, retryable transition failure, got {err}"
        ));
    }
    Ok(())
}

#[then("the transition is rejected as invalid")]
fn transition_rejected(world: &TransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result in scenario world"))?;
    if !matches!(
        result,
        Err(SessionError::Transition(TransitionError::Edit(
            CacheError::Domain(TaskDomainError::EmptyTitle)
        )))
    ) {
        return Err(eyre::eyre!("expected an empty title rejection, got {result:?}"));
    }
    Ok(())
}

#[then("the completed view has nothing pending")]
fn nothing_pending(world: &TransitionWorld) -> Result<(), eyre::Report> {
    let pending = world
        .relay
        .has_pending(&ViewKey::COMPLETED)
        .map_err(|err| eyre::eyre!("read relay: {err}"))?;
    if pending {
        return Err(eyre::eyre!("expected no pending hand-off for the completed view"));
    }
    Ok(())
}
