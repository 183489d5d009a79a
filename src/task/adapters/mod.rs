//! Adapter implementations of the task ports.
//!
//! - [`http`]: the task service over HTTP with JSON payloads
//! - [`memory`]: an in-process task service for tests and demos
//! - [`offline`]: the remote type of caches that never persist

pub mod http;
pub mod memory;
pub mod offline;
