//! Port contracts for the task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod service;

pub use service::{NewTask, TaskService, TaskServiceError, TaskServiceResult};

#[cfg(test)]
pub use service::MockTaskService;
