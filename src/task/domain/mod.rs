//! Domain model for the task lifecycle.
//!
//! A task lives in exactly one of two ordered partitions, active or
//! completed. The domain types here carry no infrastructure concerns; the
//! cache and transition services enforce the partition invariants on top
//! of them.

mod error;
mod ids;
mod partition;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{ProvisionalIdGenerator, TaskId};
pub use partition::{Partition, PartitionKind, PartitionSnapshot, TransitionRecord};
pub use task::{PersistedTaskData, Task, TaskStatus, validate_title};
