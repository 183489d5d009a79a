//! JSON shapes exchanged with the task service.
//!
//! Backends in the field are loose about types: ids arrive as strings or
//! numbers, completion flags as booleans, `0`/`1`, or strings, and failures
//! as any mix of `success`, `status`, `error`, and `message`. Everything is
//! normalised here so the rest of the crate only sees domain types and
//! [`TaskServiceError`].

use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskServiceError, TaskServiceResult},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Longest body excerpt quoted in protocol errors, in characters.
const EXCERPT_CHARS: usize = 200;

/// Request body for task creation.
#[derive(Debug, Serialize)]
pub(super) struct CreateBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

/// Request body for status changes.
#[derive(Debug, Serialize)]
pub(super) struct StatusBody<'a> {
    pub task_id: &'a str,
    pub status: &'a str,
}

/// Request body for deletions.
#[derive(Debug, Serialize)]
pub(super) struct DeleteBody<'a> {
    pub task_id: &'a str,
}

/// Scalar that backends encode inconsistently.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(super) enum WireScalar {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl WireScalar {
    fn into_id(self) -> Option<TaskId> {
        match self {
            Self::Integer(value) => Some(TaskId::server(value.to_string())),
            Self::Text(value) if !value.trim().is_empty() => Some(TaskId::server(value.trim())),
            Self::Text(_) | Self::Bool(_) => None,
        }
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Integer(value) => Some(*value != 0),
            Self::Text(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" | "" => Some(false),
                _ => None,
            },
        }
    }
}

/// A task as the service reports it.
#[derive(Debug, Deserialize)]
pub(super) struct WireTask {
    id: WireScalar,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: Option<WireScalar>,
    #[serde(default)]
    status: Option<String>,
}

impl WireTask {
    /// Converts into a domain task. `fallback` is used when the payload
    /// carries neither a `status` nor a `completed` field.
    pub(super) fn into_task(self, fallback: TaskStatus) -> TaskServiceResult<Task> {
        let status = match (&self.status, &self.completed) {
            (Some(text), _) => TaskStatus::try_from(text.as_str()).map_err(TaskServiceError::protocol)?,
            (None, Some(flag)) => flag
                .as_flag()
                .map(TaskStatus::from_completed_flag)
                .ok_or_else(|| {
                    TaskServiceError::protocol(format!("unreadable completed flag {flag:?}"))
                })?,
            (None, None) => fallback,
        };
        let id = self.id.clone().into_id().ok_or_else(|| {
            TaskServiceError::protocol(format!("task id {:?} is not a string or integer", self.id))
        })?;
        Ok(Task::from_persisted(PersistedTaskData {
            id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            status,
        }))
    }
}

/// Converts a list of wire tasks, failing on the first unreadable entry.
pub(super) fn into_tasks(
    tasks: Vec<WireTask>,
    fallback: TaskStatus,
) -> TaskServiceResult<Vec<Task>> {
    tasks
        .into_iter()
        .map(|task| task.into_task(fallback))
        .collect()
}

/// Success/failure fields shared by every envelope.
#[derive(Debug, Default, Deserialize)]
pub(super) struct Outcome {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl Outcome {
    /// Reads the outcome fields of an arbitrary body; non-objects yield an
    /// empty outcome.
    pub(super) fn of(body: &Value) -> Self {
        if body.is_object() {
            Self::deserialize(body).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Returns the failure message when the body reports a failure.
    pub(super) fn failure(&self) -> Option<String> {
        let declared_failure = self.success == Some(false)
            || matches!(
                self.status.as_ref().and_then(Value::as_str),
                Some("error" | "fail" | "failure")
            );
        if let Some(error) = self.error.as_ref().filter(|value| !value.is_null()) {
            return Some(describe(error));
        }
        declared_failure.then(|| self.message().unwrap_or_else(|| "request failed".to_owned()))
    }

    /// Returns the human-readable message, preferring `error` over `message`.
    pub(super) fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .or(self.message.as_ref())
            .filter(|value| !value.is_null())
            .map(describe)
    }
}

fn describe(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToOwned::to_owned)
}

/// `{"success": true, "completedTasks": [...]}`.
#[derive(Debug, Deserialize)]
pub(super) struct CompletedList {
    #[serde(rename = "completedTasks")]
    pub completed_tasks: Vec<WireTask>,
}

/// `{"tasks": [...]}`, accepted as an alternative to a bare array.
#[derive(Debug, Deserialize)]
pub(super) struct WrappedList {
    pub tasks: Vec<WireTask>,
}

/// `{"message": "...", "task": {...}}`.
#[derive(Debug, Deserialize)]
pub(super) struct Created {
    pub task: WireTask,
}

/// Deserialises `body` into `T`, reporting failures as protocol errors.
pub(super) fn decode<T: DeserializeOwned>(body: &Value, what: &str) -> TaskServiceResult<T> {
    T::deserialize(body)
        .map_err(|err| TaskServiceError::protocol(format!("malformed {what}: {err}")))
}

/// Returns whether a `Content-Type` value declares JSON.
pub(super) fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return false;
    };
    let essence = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Shortens a body for inclusion in error messages.
pub(super) fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    let mut short: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().nth(EXCERPT_CHARS).is_some() {
        short.push_str("...");
    }
    short
}
