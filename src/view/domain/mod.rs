//! Domain types for view state hand-off.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identity of a view that can receive relayed state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewKey(Cow<'static, str>);

impl ViewKey {
    /// The view listing active tasks.
    pub const TODO: Self = Self(Cow::Borrowed("TodoView"));

    /// The view listing completed tasks.
    pub const COMPLETED: Self = Self(Cow::Borrowed("CompletedView"));

    /// Creates a key for a custom view.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ViewKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
