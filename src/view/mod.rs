//! Hand-off of task state between views that share no store.
//!
//! When one view moves a task between partitions, it publishes the
//! [`TransitionRecord`](crate::task::domain::TransitionRecord) to the
//! counterpart view's key. The counterpart consumes it the next time it
//! activates. Delivery is at most once per publish and a newer publish
//! replaces an unconsumed one.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - View sessions in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
