//! Relay port: a keyed, consume-once mailbox per destination view.

use crate::{task::domain::TransitionRecord, view::domain::ViewKey};
use thiserror::Error;

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// One-shot state channel between views.
///
/// There is no subscription and no broadcast. A destination that activates
/// without a pending publish receives nothing.
#[cfg_attr(test, mockall::automock)]
pub trait StateRelay: Send + Sync {
    /// Stores `record` for `destination`, replacing any unconsumed record.
    /// Returns the replaced record, if there was one.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] when the relay's storage is unavailable.
    fn publish(
        &self,
        destination: &ViewKey,
        record: TransitionRecord,
    ) -> RelayResult<Option<TransitionRecord>>;

    /// Takes the pending record for `destination`, leaving nothing behind.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] when the relay's storage is unavailable.
    fn consume(&self, destination: &ViewKey) -> RelayResult<Option<TransitionRecord>>;

    /// Returns whether a record is waiting for `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] when the relay's storage is unavailable.
    fn has_pending(&self, destination: &ViewKey) -> RelayResult<bool>;
}

/// Errors returned by relay implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// A writer panicked while holding the relay's lock.
    #[error("state relay lock poisoned: {0}")]
    Poisoned(String),
}
