//! Port contracts for view state hand-off.

pub mod relay;

pub use relay::{RelayError, RelayResult, StateRelay};
#[cfg(test)]
pub use relay::MockStateRelay;
