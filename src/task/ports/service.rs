//! Port for the remote task service.

use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Result type for remote task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Payload for creating a task on the task service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
}

impl NewTask {
    /// Creates a payload from title and description.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Remote task persistence contract.
///
/// Each call is an independent request/response exchange. Implementations
/// never touch a local cache; callers decide how to apply results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Lists active tasks in server order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Transport`] on network failure and
    /// [`TaskServiceError::Protocol`] when the response is not JSON.
    async fn list_active(&self) -> TaskServiceResult<Vec<Task>>;

    /// Lists completed tasks in server order.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`TaskService::list_active`].
    async fn list_completed(&self) -> TaskServiceResult<Vec<Task>>;

    /// Creates a task. The returned task carries the authoritative id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the service rejects the
    /// payload.
    async fn create(&self, task: &NewTask) -> TaskServiceResult<Task>;

    /// Sets the lifecycle status of a task. Setting the current status again
    /// succeeds without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown ids.
    async fn set_status(&self, id: &TaskId, status: TaskStatus) -> TaskServiceResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown ids.
    async fn delete(&self, id: &TaskId) -> TaskServiceResult<()>;
}

/// Errors returned by task service implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskServiceError {
    /// The service rejected the task payload.
    #[error("task rejected by the task service: {0}")]
    Validation(String),

    /// The service does not know the task.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The service could not be reached or the exchange was cut short.
    #[error("task service unreachable: {0}")]
    Transport(String),

    /// The service answered with something other than the expected JSON.
    #[error("unexpected task service response: {0}")]
    Protocol(String),

    /// The service answered with a well-formed failure report.
    #[error("task service declined the request (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Message reported by the service.
        message: String,
    },
}

impl TaskServiceError {
    /// Wraps a transport-level failure.
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Wraps a response that could not be understood.
    pub fn protocol(err: impl fmt::Display) -> Self {
        Self::Protocol(err.to_string())
    }

    /// Returns whether retrying the same call unchanged may succeed.
    ///
    /// Non-JSON answers are usually server error pages, so protocol failures
    /// count as transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Protocol(_) | Self::Rejected { .. }
        )
    }
}
