//! Adapter implementations of the view ports.

pub mod memory;

pub use memory::InMemoryStateRelay;
