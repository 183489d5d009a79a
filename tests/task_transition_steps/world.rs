//! Shared world state for task transition BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasksync::{
    task::{
        adapters::memory::InMemoryTaskService,
        domain::{TaskId, TransitionRecord},
        services::LocalTaskCache,
    },
    view::{
        adapters::InMemoryStateRelay,
        domain::ViewKey,
        services::{SessionError, ViewSession},
    },
};

/// View session type used by the BDD world.
pub type TestSession = ViewSession<InMemoryTaskService, DefaultClock, InMemoryStateRelay>;

/// Scenario world for task transition behaviour tests.
pub struct TransitionWorld {
    pub service: InMemoryTaskService,
    pub relay: Arc<InMemoryStateRelay>,
    pub todo: Option<TestSession>,
    pub completed: Option<TestSession>,
    pub last_transition_result: Option<Result<TransitionRecord, SessionError>>,
}

impl TransitionWorld {
    /// Creates a world with an empty task service and no open views.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: InMemoryTaskService::new(),
            relay: Arc::new(InMemoryStateRelay::new()),
            todo: None,
            completed: None,
            last_transition_result: None,
        }
    }

    /// Opens a view session on a fresh cache.
    #[must_use]
    pub fn open_view(&self, key: ViewKey, counterpart: ViewKey) -> TestSession {
        let cache =
            LocalTaskCache::with_remote(Arc::new(self.service.clone()), Arc::new(DefaultClock));
        ViewSession::new(key, counterpart, cache, Arc::clone(&self.relay))
    }

    /// Returns the to-do view session.
    ///
    /// # Errors
    ///
    /// Returns an error if the views have not been opened.
    pub fn todo_view(&mut self) -> Result<&mut TestSession, eyre::Report> {
        self.todo
            .as_mut()
            .ok_or_else(|| eyre::eyre!("to-do view is not open in scenario world"))
    }

    /// Returns the completed view session.
    ///
    /// # Errors
    ///
    /// Returns an error if the views have not been opened.
    pub fn completed_view(&mut self) -> Result<&mut TestSession, eyre::Report> {
        self.completed
            .as_mut()
            .ok_or_else(|| eyre::eyre!("completed view is not open in scenario world"))
    }
}

impl Default for TransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TransitionWorld {
    TransitionWorld::default()
}

/// Finds the id of the task titled `title` in either partition of `session`.
///
/// # Errors
///
/// Returns an error if the session's cache holds no such task.
pub fn task_id_by_title(session: &TestSession, title: &str) -> Result<TaskId, eyre::Report> {
    let cache = session.cache();
    cache
        .active()
        .iter()
        .chain(cache.completed().iter())
        .find(|task| task.title() == title)
        .map(|task| task.id().clone())
        .ok_or_else(|| eyre::eyre!("no task titled {title:?} in the {} view", session.key()))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
