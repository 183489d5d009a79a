//! Identifier types for the task domain.

use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task.
///
/// Tasks created on the device start with a [`TaskId::Provisional`] value
/// minted from the clock. Once the task service accepts the task, the cache
/// swaps in the server-assigned [`TaskId::Server`] value, which is stable
/// across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TaskId {
    /// Identifier assigned by the task service.
    Server(String),
    /// Client-minted, timestamp-derived identifier.
    Provisional(u64),
}

impl TaskId {
    /// Creates a server-assigned identifier.
    #[must_use]
    pub fn server(value: impl Into<String>) -> Self {
        Self::Server(value.into())
    }

    /// Returns `true` when the task service has not yet assigned an id.
    #[must_use]
    pub const fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }

    /// Returns the server-assigned value, if any.
    #[must_use]
    pub fn as_server(&self) -> Option<&str> {
        match self {
            Self::Server(value) => Some(value),
            Self::Provisional(_) => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(value) => write!(f, "{value}"),
            Self::Provisional(value) => write!(f, "local-{value}"),
        }
    }
}

/// Mints strictly increasing provisional identifiers.
///
/// Values are the clock's Unix timestamp in milliseconds. When the clock has
/// not advanced since the previous mint (or has gone backwards), the previous
/// value is bumped by one so that identifiers never repeat within a session.
#[derive(Debug, Clone, Default)]
pub struct ProvisionalIdGenerator {
    last: u64,
}

impl ProvisionalIdGenerator {
    /// Creates a generator that has not minted any identifier yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Mints the next provisional identifier.
    pub fn mint(&mut self, clock: &impl Clock) -> TaskId {
        let millis = u64::try_from(clock.utc().timestamp_millis()).unwrap_or_default();
        let value = if millis > self.last {
            millis
        } else {
            self.last.saturating_add(1)
        };
        self.last = value;
        TaskId::Provisional(value)
    }
}
