//! Local task cache: the two partitions a view operates on.

use crate::task::{
    adapters::offline::OfflineTaskService,
    domain::{
        Partition, PartitionKind, PartitionSnapshot, ProvisionalIdGenerator, Task,
        TaskDomainError, TaskId, TransitionRecord,
    },
    ports::{NewTask, TaskService, TaskServiceError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Service-level errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Domain validation failed; nothing was changed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No partition holds the task.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A remote call failed and the local change was not applied.
    #[error(transparent)]
    Remote(#[from] TaskServiceError),

    /// The task was added locally but the task service did not accept it.
    /// The optimistic entry stays in the active partition.
    #[error("task {} added locally but not persisted: {source}", .task.id())]
    Unsynced {
        /// The optimistic task, still carrying its provisional id.
        task: Box<Task>,
        /// Remote failure.
        source: TaskServiceError,
    },
}

impl CacheError {
    /// Returns whether retrying the operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(_) | Self::NotFound(_) => false,
            Self::Remote(err) | Self::Unsynced { source: err, .. } => err.is_retryable(),
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache shared by a multi-threaded host; the mutex admits one writer at a
/// time.
pub type SharedTaskCache<S, C> = Arc<Mutex<LocalTaskCache<S, C>>>;

/// Cache that never talks to a task service.
pub type OfflineTaskCache<C> = LocalTaskCache<OfflineTaskService, C>;

/// Active and completed partitions of one view session.
///
/// With a task service wired the cache applies mutations optimistically and
/// reconciles with the service's answers; without one it is a purely local
/// task list. Additive changes survive remote failures, destructive ones are
/// only applied once the service confirms them.
#[derive(Debug)]
pub struct LocalTaskCache<S, C>
where
    S: TaskService,
    C: Clock + Send + Sync,
{
    pub(super) active: Partition,
    pub(super) completed: Partition,
    pub(super) remote: Option<Arc<S>>,
    clock: Arc<C>,
    ids: ProvisionalIdGenerator,
}

impl<S, C> LocalTaskCache<S, C>
where
    S: TaskService,
    C: Clock + Send + Sync,
{
    /// Creates an empty cache without a task service.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self {
            active: Partition::new(PartitionKind::Active),
            completed: Partition::new(PartitionKind::Completed),
            remote: None,
            clock,
            ids: ProvisionalIdGenerator::new(),
        }
    }

    /// Creates an empty cache backed by `remote`.
    #[must_use]
    pub const fn with_remote(remote: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            active: Partition::new(PartitionKind::Active),
            completed: Partition::new(PartitionKind::Completed),
            remote: Some(remote),
            clock,
            ids: ProvisionalIdGenerator::new(),
        }
    }

    /// Wraps the cache for use from several threads.
    #[must_use]
    pub fn into_shared(self) -> SharedTaskCache<S, C> {
        Arc::new(Mutex::new(self))
    }

    /// Returns whether a task service is wired.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the active partition.
    #[must_use]
    pub const fn active(&self) -> &Partition {
        &self.active
    }

    /// Returns the completed partition.
    #[must_use]
    pub const fn completed(&self) -> &Partition {
        &self.completed
    }

    /// Returns the partition of `kind`.
    #[must_use]
    pub const fn partition(&self, kind: PartitionKind) -> &Partition {
        match kind {
            PartitionKind::Active => &self.active,
            PartitionKind::Completed => &self.completed,
        }
    }

    pub(super) const fn partition_mut(&mut self, kind: PartitionKind) -> &mut Partition {
        match kind {
            PartitionKind::Active => &mut self.active,
            PartitionKind::Completed => &mut self.completed,
        }
    }

    /// Returns which partition holds the task.
    #[must_use]
    pub fn partition_of(&self, id: &TaskId) -> Option<PartitionKind> {
        if self.active.contains(id) {
            Some(PartitionKind::Active)
        } else if self.completed.contains(id) {
            Some(PartitionKind::Completed)
        } else {
            None
        }
    }

    /// Finds a task in either partition.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.active.get(id).or_else(|| self.completed.get(id))
    }

    /// Adds a task to the active partition.
    ///
    /// The task is appended with a provisional id before the service is
    /// asked to create it; on success the provisional id is swapped for the
    /// server id in place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Domain`] for blank titles, leaving both
    /// partitions untouched, and [`CacheError::Unsynced`] when the service
    /// fails; the optimistic entry is kept in that case.
    pub async fn add(&mut self, title: &str, description: &str) -> CacheResult<Task> {
        let provisional_id = self.ids.mint(&*self.clock);
        let task = Task::new(provisional_id.clone(), title, description)?;
        self.active.push(task.clone());
        debug!(task_id = %provisional_id, "task added locally");

        let Some(remote) = self.remote.clone() else {
            return Ok(task);
        };

        match remote.create(&NewTask::new(title, description)).await {
            Ok(created) => Ok(self.adopt_created(&provisional_id, created)),
            Err(err) => {
                warn!(task_id = %provisional_id, error = %err, "task kept locally after create failed");
                Err(CacheError::Unsynced {
                    task: Box::new(task),
                    source: err,
                })
            }
        }
    }

    /// Swaps the provisional id of an added task for the server id.
    fn adopt_created(&mut self, provisional_id: &TaskId, created: Task) -> Task {
        let server_id = created.id().clone();
        if self.partition_of(&server_id).is_some() {
            // The service's copy is already cached, drop the optimistic one.
            self.active.remove(provisional_id);
            info!(task_id = %server_id, "created task was already cached");
            return self.find(&server_id).cloned().unwrap_or(created);
        }
        match self.active.get_mut(provisional_id) {
            Some(task) => {
                task.adopt_server_id(server_id.clone());
                info!(provisional_id = %provisional_id, task_id = %server_id, "task persisted");
                task.clone()
            }
            None => created,
        }
    }

    /// Replaces title and description of a task in either partition.
    /// Position and partition are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] for unknown ids and
    /// [`CacheError::Domain`] for blank titles.
    pub fn edit(&mut self, id: &TaskId, title: &str, description: &str) -> CacheResult<Task> {
        let kind = self
            .partition_of(id)
            .ok_or_else(|| CacheError::NotFound(id.clone()))?;
        let task = self
            .partition_mut(kind)
            .get_mut(id)
            .ok_or_else(|| CacheError::NotFound(id.clone()))?;
        task.edit(title, description)?;
        Ok(task.clone())
    }

    /// Removes a task from whichever partition holds it.
    ///
    /// With a task service wired the deletion is persisted first and the
    /// cache only changes once the service confirms it. Tasks that were
    /// never persisted are removed locally.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] for unknown ids and
    /// [`CacheError::Remote`] when the service fails; the task stays in its
    /// partition in that case.
    pub async fn remove(&mut self, id: &TaskId) -> CacheResult<Task> {
        let kind = self
            .partition_of(id)
            .ok_or_else(|| CacheError::NotFound(id.clone()))?;

        if let Some(remote) = self.remote.clone() {
            if id.is_provisional() {
                debug!(task_id = %id, "removing task that was never persisted");
            } else if let Err(err) = remote.delete(id).await {
                warn!(task_id = %id, error = %err, "task kept after delete failed");
                return Err(CacheError::Remote(err));
            }
        }

        let removed = self
            .partition_mut(kind)
            .remove(id)
            .ok_or_else(|| CacheError::NotFound(id.clone()))?;
        info!(task_id = %id, partition = %kind, "task removed");
        Ok(removed)
    }

    /// Replaces a partition wholesale with the service's authoritative list,
    /// in the given order.
    ///
    /// Duplicate ids keep their first occurrence, and tasks listed here are
    /// dropped from the other partition so every id stays in exactly one
    /// partition.
    pub fn reconcile(&mut self, kind: PartitionKind, server_tasks: Vec<Task>) {
        let mut seen = HashSet::new();
        let tasks: Vec<Task> = server_tasks
            .into_iter()
            .filter(|task| seen.insert(task.id().clone()))
            .collect();

        let other = self.partition_mut(kind.other());
        for id in &seen {
            other.remove(id);
        }
        self.partition_mut(kind).replace_all(tasks);
        info!(partition = %kind, count = seen.len(), "partition reconciled");
    }

    /// Reconciles the partition a snapshot was taken from.
    pub fn replace_partition(&mut self, snapshot: PartitionSnapshot) {
        let kind = snapshot.kind();
        self.reconcile(kind, snapshot.into_tasks());
    }

    /// Applies a transition committed by another view.
    ///
    /// The moved task leaves whichever partition held it and is placed in
    /// the destination: in its existing position when already held there,
    /// otherwise at the end. Other snapshot tasks are not applied; tasks
    /// this view has never seen arrive through a refresh.
    pub fn absorb_transition(&mut self, record: TransitionRecord) {
        let destination = record.destination();
        let (moved, _) = record.into_parts();
        self.partition_mut(destination.other()).remove(moved.id());
        self.partition_mut(destination).upsert(moved);
        debug!(partition = %destination, "transition absorbed");
    }

    /// Fetches active tasks from the service and reconciles them.
    /// Without a service the partition is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Remote`] when the service fails; the partition
    /// is left as it was.
    pub async fn refresh_active(&mut self) -> CacheResult<&Partition> {
        self.refresh(PartitionKind::Active).await
    }

    /// Fetches completed tasks from the service and reconciles them.
    /// Without a service the partition is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Remote`] when the service fails; the partition
    /// is left as it was.
    pub async fn refresh_completed(&mut self) -> CacheResult<&Partition> {
        self.refresh(PartitionKind::Completed).await
    }

    async fn refresh(&mut self, kind: PartitionKind) -> CacheResult<&Partition> {
        if let Some(remote) = self.remote.clone() {
            let listed = match kind {
                PartitionKind::Active => remote.list_active().await,
                PartitionKind::Completed => remote.list_completed().await,
            };
            let tasks = listed.inspect_err(|err| {
                warn!(partition = %kind, error = %err, "refresh failed");
            })?;
            self.reconcile(kind, tasks);
        }
        Ok(self.partition(kind))
    }
}
