//! Task lifecycle and state reconciliation.
//!
//! A task is either active or completed and lives in the matching
//! partition of a [`services::LocalTaskCache`]. The cache applies changes
//! optimistically and, when a task service is wired, persists them through
//! the [`ports::TaskService`] port. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
