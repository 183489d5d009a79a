//! Task entity and lifecycle status.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task still has to be done.
    Active,
    /// Task has been completed.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Maps a `completed` flag onto a status.
    #[must_use]
    pub const fn from_completed_flag(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Active
        }
    }

    /// Returns `true` for [`TaskStatus::Completed`].
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the other lifecycle status.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Active => Self::Completed,
            Self::Completed => Self::Active,
        }
    }

    /// Returns whether moving from `self` to `target` is a lifecycle
    /// transition. Only `active -> completed` and `completed -> active` are.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        !matches!(
            (self, target),
            (Self::Active, Self::Active) | (Self::Completed, Self::Completed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" | "incomplete" => Ok(Self::Active),
            "completed" | "complete" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Checks that a title contains at least one non-whitespace character.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyTitle`] for empty or whitespace-only
/// titles.
pub fn validate_title(title: &str) -> Result<(), TaskDomainError> {
    if title.trim().is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(())
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
}

/// Parameter object for reconstructing a task reported by the task service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let title_value = title.into();
        validate_title(&title_value)?;
        Ok(Self {
            id,
            title: title_value,
            description: description.into(),
            status: TaskStatus::Active,
        })
    }

    /// Reconstructs a task from task service data.
    ///
    /// Server data is authoritative and is not re-validated.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Replaces title and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the new title is blank;
    /// the task is left unchanged.
    pub fn edit(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), TaskDomainError> {
        let title_value = title.into();
        validate_title(&title_value)?;
        self.title = title_value;
        self.description = description.into();
        Ok(())
    }

    /// Moves the task to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// already in `target`.
    pub fn transition_to(&mut self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id.clone(),
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    /// Forces the status, used when a partition adopts the task.
    pub(crate) const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Replaces a provisional id with the id assigned by the task service.
    ///
    /// Server ids are never overwritten.
    pub(crate) fn adopt_server_id(&mut self, id: TaskId) -> bool {
        if !self.id.is_provisional() || id.is_provisional() {
            return false;
        }
        self.id = id;
        true
    }
}
