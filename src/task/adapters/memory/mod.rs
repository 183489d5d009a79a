//! In-memory adapter for the task service port.

mod service;

pub use service::{InMemoryTaskService, ServiceCall, ServiceOperation};
