//! In-process state relay.

use crate::{
    task::domain::TransitionRecord,
    view::{
        domain::ViewKey,
        ports::{RelayError, RelayResult, StateRelay},
    },
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Relay backed by a mutex-guarded map. Clones share the same mailboxes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateRelay {
    pending: Arc<Mutex<HashMap<ViewKey, TransitionRecord>>>,
}

impl InMemoryStateRelay {
    /// Creates a relay with no pending records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> RelayError {
    RelayError::Poisoned(err.to_string())
}

impl StateRelay for InMemoryStateRelay {
    fn publish(
        &self,
        destination: &ViewKey,
        record: TransitionRecord,
    ) -> RelayResult<Option<TransitionRecord>> {
        let mut pending = self.pending.lock().map_err(poisoned)?;
        let replaced = pending.insert(destination.clone(), record);
        debug!(
            view = %destination,
            replaced = replaced.is_some(),
            "transition published"
        );
        Ok(replaced)
    }

    fn consume(&self, destination: &ViewKey) -> RelayResult<Option<TransitionRecord>> {
        let mut pending = self.pending.lock().map_err(poisoned)?;
        Ok(pending.remove(destination))
    }

    fn has_pending(&self, destination: &ViewKey) -> RelayResult<bool> {
        let pending = self.pending.lock().map_err(poisoned)?;
        Ok(pending.contains_key(destination))
    }
}
