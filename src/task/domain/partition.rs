//! Ordered task partitions and their immutable snapshots.

use super::{Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two partitions a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKind {
    /// Tasks still to be done.
    Active,
    /// Tasks that have been completed.
    Completed,
}

impl PartitionKind {
    /// Returns the partition that holds tasks with `status`.
    #[must_use]
    pub const fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Active => Self::Active,
            TaskStatus::Completed => Self::Completed,
        }
    }

    /// Returns the status shared by every member of this partition.
    #[must_use]
    pub const fn status(self) -> TaskStatus {
        match self {
            Self::Active => TaskStatus::Active,
            Self::Completed => TaskStatus::Completed,
        }
    }

    /// Returns the other partition.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Active => Self::Completed,
            Self::Completed => Self::Active,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered collection of tasks sharing a status.
///
/// Insertion order is display order. Every member carries the status of the
/// partition's [`PartitionKind`]; tasks are normalised on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    kind: PartitionKind,
    tasks: Vec<Task>,
}

impl Partition {
    /// Creates an empty partition.
    #[must_use]
    pub const fn new(kind: PartitionKind) -> Self {
        Self {
            kind,
            tasks: Vec::new(),
        }
    }

    /// Returns the partition kind.
    #[must_use]
    pub const fn kind(&self) -> PartitionKind {
        self.kind
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterates tasks in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Iterates task identifiers in display order.
    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.iter().map(Task::id)
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the partition holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns whether a task with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Returns the display position of the task with `id`.
    #[must_use]
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    /// Returns the task with `id`.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Appends a task, adopting it into this partition's status.
    pub(crate) fn push(&mut self, mut task: Task) {
        task.set_status(self.kind.status());
        self.tasks.push(task);
    }

    /// Replaces the task sharing `task`'s id in place, or appends it.
    pub(crate) fn upsert(&mut self, mut task: Task) {
        task.set_status(self.kind.status());
        match self.get_mut(task.id()) {
            Some(held) => *held = task,
            None => self.tasks.push(task),
        }
    }

    /// Removes and returns the task with `id`, preserving the order of the
    /// remaining tasks.
    pub(crate) fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let position = self.position(id)?;
        Some(self.tasks.remove(position))
    }

    /// Replaces every task, keeping the given order.
    pub(crate) fn replace_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks.clear();
        for task in tasks {
            self.push(task);
        }
    }

    /// Captures the current contents by value.
    #[must_use]
    pub fn snapshot(&self) -> PartitionSnapshot {
        PartitionSnapshot {
            kind: self.kind,
            tasks: self.tasks.clone(),
        }
    }
}

/// Immutable copy of a partition taken at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    kind: PartitionKind,
    tasks: Vec<Task>,
}

impl PartitionSnapshot {
    /// Returns which partition the snapshot was taken from.
    #[must_use]
    pub const fn kind(&self) -> PartitionKind {
        self.kind
    }

    /// Returns the captured tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the number of captured tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the snapshot holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Consumes the snapshot, returning its tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

/// A committed move of a task between partitions, as handed to another view.
///
/// Carries the moved task and the destination partition's contents right
/// after the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    task: Task,
    snapshot: PartitionSnapshot,
}

impl TransitionRecord {
    /// Creates a record for `task` landing in the partition `snapshot` was
    /// taken from.
    #[must_use]
    pub const fn new(task: Task, snapshot: PartitionSnapshot) -> Self {
        Self { task, snapshot }
    }

    /// Returns the moved task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the destination partition.
    #[must_use]
    pub const fn destination(&self) -> PartitionKind {
        self.snapshot.kind
    }

    /// Returns the destination partition snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &PartitionSnapshot {
        &self.snapshot
    }

    /// Splits the record into the moved task and the snapshot.
    #[must_use]
    pub fn into_parts(self) -> (Task, PartitionSnapshot) {
        (self.task, self.snapshot)
    }
}
