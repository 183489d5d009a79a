//! Moves tasks between the active and completed partitions.

use super::cache::{CacheError, LocalTaskCache};
use crate::task::{
    domain::{PartitionKind, TaskDomainError, TaskId, TaskStatus, TransitionRecord},
    ports::{TaskService, TaskServiceError},
};
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by partition transitions.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The task is not in the partition the transition starts from.
    #[error("task {id} is not in the {expected} partition")]
    NotFound {
        /// Requested task.
        id: TaskId,
        /// Partition the task had to be in.
        expected: PartitionKind,
    },

    /// No partition holds the task.
    #[error("task not found: {0}")]
    Missing(TaskId),

    /// The edit requested together with the move failed; nothing moved.
    #[error(transparent)]
    Edit(#[from] CacheError),

    /// The task refused the status change.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The move is committed locally but the task service did not record the
    /// new status. Retry with [`LocalTaskCache::retry_status_sync`].
    #[error("task {} moved to {} locally but not persisted: {source}", .record.task().id(), .record.destination())]
    Unsynced {
        /// The committed transition.
        record: Box<TransitionRecord>,
        /// Remote failure.
        source: TaskServiceError,
    },

    /// Re-sending a status failed.
    #[error(transparent)]
    Remote(TaskServiceError),
}

impl TransitionError {
    /// Returns the committed transition when the move happened despite the
    /// error.
    #[must_use]
    pub fn committed(&self) -> Option<&TransitionRecord> {
        match self {
            Self::Unsynced { record, .. } => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Returns whether retrying may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Missing(_) | Self::Domain(_) => false,
            Self::Edit(err) => err.is_retryable(),
            Self::Unsynced { source: err, .. } | Self::Remote(err) => err.is_retryable(),
        }
    }
}

/// Result type for transitions.
pub type TransitionResult<T> = Result<T, TransitionError>;

impl<S, C> LocalTaskCache<S, C>
where
    S: TaskService,
    C: Clock + Send + Sync,
{
    /// Moves an active task to the completed partition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotFound`] when the task is not active and
    /// [`TransitionError::Unsynced`] when the service fails after the local
    /// move; the move is not undone.
    pub async fn complete(&mut self, id: &TaskId) -> TransitionResult<TransitionRecord> {
        self.move_task(id, TaskStatus::Completed).await
    }

    /// Moves a completed task back to the active partition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotFound`] when the task is not completed
    /// and [`TransitionError::Unsynced`] when the service fails after the
    /// local move; the move is not undone.
    pub async fn reopen(&mut self, id: &TaskId) -> TransitionResult<TransitionRecord> {
        self.move_task(id, TaskStatus::Active).await
    }

    /// Applies an edit, then completes the task.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Edit`] when the edit fails, in which case
    /// the task does not move, otherwise as [`Self::complete`].
    pub async fn edit_then_complete(
        &mut self,
        id: &TaskId,
        title: &str,
        description: &str,
    ) -> TransitionResult<TransitionRecord> {
        self.ensure_in(id, PartitionKind::Active)?;
        self.edit(id, title, description)?;
        self.complete(id).await
    }

    /// Applies an edit, then reopens the task.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Edit`] when the edit fails, in which case
    /// the task does not move, otherwise as [`Self::reopen`].
    pub async fn edit_then_reopen(
        &mut self,
        id: &TaskId,
        title: &str,
        description: &str,
    ) -> TransitionResult<TransitionRecord> {
        self.ensure_in(id, PartitionKind::Completed)?;
        self.edit(id, title, description)?;
        self.reopen(id).await
    }

    /// Sends the task's current status to the service again, after an
    /// [`TransitionError::Unsynced`] failure.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Missing`] when no partition holds the task
    /// and [`TransitionError::Remote`] when the service fails again.
    pub async fn retry_status_sync(&mut self, id: &TaskId) -> TransitionResult<()> {
        let kind = self
            .partition_of(id)
            .ok_or_else(|| TransitionError::Missing(id.clone()))?;
        self.sync_status(id, kind.status())
            .await
            .map_err(TransitionError::Remote)
    }

    fn ensure_in(&self, id: &TaskId, kind: PartitionKind) -> TransitionResult<()> {
        if self.partition(kind).contains(id) {
            Ok(())
        } else {
            Err(TransitionError::NotFound {
                id: id.clone(),
                expected: kind,
            })
        }
    }

    async fn move_task(
        &mut self,
        id: &TaskId,
        target: TaskStatus,
    ) -> TransitionResult<TransitionRecord> {
        let source = PartitionKind::for_status(target.opposite());
        let destination = PartitionKind::for_status(target);
        self.ensure_in(id, source)?;

        let mut task = self
            .partition_mut(source)
            .remove(id)
            .ok_or_else(|| TransitionError::NotFound {
                id: id.clone(),
                expected: source,
            })?;
        if let Err(err) = task.transition_to(target) {
            self.partition_mut(source).push(task);
            return Err(err.into());
        }
        self.partition_mut(destination).push(task.clone());
        let record = TransitionRecord::new(task, self.partition(destination).snapshot());
        info!(task_id = %id, from = %source, to = %destination, "task moved");

        if let Err(err) = self.sync_status(id, target).await {
            warn!(task_id = %id, error = %err, "status change kept locally after sync failed");
            return Err(TransitionError::Unsynced {
                record: Box::new(record),
                source: err,
            });
        }
        Ok(record)
    }

    /// Persists `status` for the task when a service is wired and the task
    /// has a server id.
    async fn sync_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), TaskServiceError> {
        let Some(remote) = self.remote.as_ref() else {
            return Ok(());
        };
        if id.is_provisional() {
            debug!(task_id = %id, "status kept locally for task that was never persisted");
            return Ok(());
        }
        remote.set_status(id, status).await
    }
}
