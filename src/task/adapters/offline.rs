//! Task service placeholder for caches that run without a remote.

use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{NewTask, TaskService, TaskServiceResult},
};
use async_trait::async_trait;

/// Uninhabited task service used as the remote type of local-only caches.
///
/// No value of this type exists, so a cache parameterised with it can never
/// issue a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineTaskService {}

#[async_trait]
impl TaskService for OfflineTaskService {
    async fn list_active(&self) -> TaskServiceResult<Vec<Task>> {
        match *self {}
    }

    async fn list_completed(&self) -> TaskServiceResult<Vec<Task>> {
        match *self {}
    }

    async fn create(&self, _task: &NewTask) -> TaskServiceResult<Task> {
        match *self {}
    }

    async fn set_status(&self, _id: &TaskId, _status: TaskStatus) -> TaskServiceResult<()> {
        match *self {}
    }

    async fn delete(&self, _id: &TaskId) -> TaskServiceResult<()> {
        match *self {}
    }
}
