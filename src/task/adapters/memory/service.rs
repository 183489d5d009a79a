//! In-memory task service for cache, transition, and view tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{NewTask, TaskService, TaskServiceError, TaskServiceResult},
};

/// Task service operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOperation {
    /// [`TaskService::list_active`].
    ListActive,
    /// [`TaskService::list_completed`].
    ListCompleted,
    /// [`TaskService::create`].
    Create,
    /// [`TaskService::set_status`].
    SetStatus,
    /// [`TaskService::delete`].
    Delete,
}

/// A call received by the in-memory service, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    /// Active tasks were listed.
    ListActive,
    /// Completed tasks were listed.
    ListCompleted,
    /// A task was created with the given payload.
    Create(NewTask),
    /// A status change was requested.
    SetStatus(TaskId, TaskStatus),
    /// A deletion was requested.
    Delete(TaskId),
}

impl ServiceCall {
    const fn operation(&self) -> ServiceOperation {
        match self {
            Self::ListActive => ServiceOperation::ListActive,
            Self::ListCompleted => ServiceOperation::ListCompleted,
            Self::Create(_) => ServiceOperation::Create,
            Self::SetStatus(..) => ServiceOperation::SetStatus,
            Self::Delete(_) => ServiceOperation::Delete,
        }
    }
}

/// Thread-safe in-memory task service.
///
/// Behaves like a well-formed backend: ids are assigned sequentially,
/// status changes are idempotent, and unknown ids are reported as not found.
/// Failures can be injected per operation to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskService {
    state: Arc<RwLock<InMemoryServiceState>>,
}

#[derive(Debug, Default)]
struct InMemoryServiceState {
    tasks: Vec<Task>,
    last_id: u64,
    calls: Vec<ServiceCall>,
    next_failures: HashMap<ServiceOperation, TaskServiceError>,
    standing_failures: HashMap<ServiceOperation, TaskServiceError>,
}

impl InMemoryServiceState {
    /// Records the call and returns an injected failure, if any.
    fn record(&mut self, call: ServiceCall) -> TaskServiceResult<()> {
        let operation = call.operation();
        self.calls.push(call);
        if let Some(err) = self.next_failures.remove(&operation) {
            return Err(err);
        }
        if let Some(err) = self.standing_failures.get(&operation) {
            return Err(err.clone());
        }
        Ok(())
    }

    fn insert(&mut self, title: String, description: String, status: TaskStatus) -> Task {
        self.last_id = self.last_id.saturating_add(1);
        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::server(self.last_id.to_string()),
            title,
            description,
            status,
        });
        self.tasks.push(task.clone());
        task
    }

    fn with_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.status() == status)
            .cloned()
            .collect()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskServiceError {
    TaskServiceError::transport(format!("in-memory task service lock poisoned: {err}"))
}

impl InMemoryTaskService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a task directly, bypassing call recording and validation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn seed(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
    ) -> TaskServiceResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state.insert(title.into(), description.into(), status))
    }

    /// Makes the next call to `operation` fail with `err`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn fail_next(
        &self,
        operation: ServiceOperation,
        err: TaskServiceError,
    ) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.next_failures.insert(operation, err);
        Ok(())
    }

    /// Makes every call to `operation` fail with `err` until cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn fail_always(
        &self,
        operation: ServiceOperation,
        err: TaskServiceError,
    ) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.standing_failures.insert(operation, err);
        Ok(())
    }

    /// Removes every injected failure.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn clear_failures(&self) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.next_failures.clear();
        state.standing_failures.clear();
        Ok(())
    }

    /// Returns the calls received so far.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn calls(&self) -> TaskServiceResult<Vec<ServiceCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }

    /// Returns stored tasks with `status`, without recording a call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] when lock acquisition fails.
    pub fn stored(&self, status: TaskStatus) -> TaskServiceResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.with_status(status))
    }
}

#[async_trait]
impl TaskService for InMemoryTaskService {
    async fn list_active(&self) -> TaskServiceResult<Vec<Task>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.record(ServiceCall::ListActive)?;
        Ok(state.with_status(TaskStatus::Active))
    }

    async fn list_completed(&self) -> TaskServiceResult<Vec<Task>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.record(ServiceCall::ListCompleted)?;
        Ok(state.with_status(TaskStatus::Completed))
    }

    async fn create(&self, task: &NewTask) -> TaskServiceResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.record(ServiceCall::Create(task.clone()))?;
        if task.title.trim().is_empty() {
            return Err(TaskServiceError::Validation("title is required".to_owned()));
        }
        Ok(state.insert(
            task.title.clone(),
            task.description.clone(),
            TaskStatus::Active,
        ))
    }

    async fn set_status(&self, id: &TaskId, status: TaskStatus) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.record(ServiceCall::SetStatus(id.clone(), status))?;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| TaskServiceError::NotFound(id.clone()))?;
        if task.status() != status {
            task.set_status(status);
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> TaskServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.record(ServiceCall::Delete(id.clone()))?;
        let position = state
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or_else(|| TaskServiceError::NotFound(id.clone()))?;
        state.tasks.remove(position);
        Ok(())
    }
}
