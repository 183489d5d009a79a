//! Tasksync: task lifecycle and state reconciliation for a to-do client.
//!
//! This crate provides the core of a mobile task-tracking client: moving
//! tasks between the active and completed partitions, keeping a local
//! in-memory cache consistent with a remote task service, and handing state
//! between views that do not share a store.
//!
//! # Architecture
//!
//! Tasksync follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task model, task service client, local cache, and transitions
//! - [`view`]: One-shot state relay between views and view sessions

pub mod task;
pub mod view;
