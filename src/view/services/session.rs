//! A view's task cache wired to the relay.

use crate::{
    task::{
        domain::{TaskId, TransitionRecord},
        ports::TaskService,
        services::{LocalTaskCache, TransitionError},
    },
    view::{
        domain::ViewKey,
        ports::{RelayError, StateRelay},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by view session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transition failed. An [`TransitionError::Unsynced`] transition
    /// has still been published to the counterpart view.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// The relay could not be used.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// An unsynced transition was committed locally, then publishing it
    /// failed as well.
    #[error("{transition}; publishing the committed move failed: {relay}")]
    Unpublished {
        /// The unsynced transition, carrying the committed record.
        transition: TransitionError,
        /// Why the relay refused the record.
        #[source]
        relay: RelayError,
    },
}

impl SessionError {
    /// Returns the transition committed locally despite the error.
    #[must_use]
    pub fn committed(&self) -> Option<&TransitionRecord> {
        match self {
            Self::Transition(err) | Self::Unpublished { transition: err, .. } => err.committed(),
            Self::Relay(_) => None,
        }
    }
}

/// Result type for view session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// One view's cache plus the relay it exchanges transitions through.
///
/// Transitions committed here are published to the counterpart view, and
/// transitions the counterpart published are absorbed on [`Self::activate`].
pub struct ViewSession<S, C, R>
where
    S: TaskService,
    C: Clock + Send + Sync,
    R: StateRelay,
{
    key: ViewKey,
    counterpart: ViewKey,
    cache: LocalTaskCache<S, C>,
    relay: Arc<R>,
}

impl<S, C, R> ViewSession<S, C, R>
where
    S: TaskService,
    C: Clock + Send + Sync,
    R: StateRelay,
{
    /// Creates a session for the view `key` that hands transitions to
    /// `counterpart`.
    #[must_use]
    pub const fn new(
        key: ViewKey,
        counterpart: ViewKey,
        cache: LocalTaskCache<S, C>,
        relay: Arc<R>,
    ) -> Self {
        Self {
            key,
            counterpart,
            cache,
            relay,
        }
    }

    /// Returns this view's key.
    #[must_use]
    pub const fn key(&self) -> &ViewKey {
        &self.key
    }

    /// Returns the key transitions are published to.
    #[must_use]
    pub const fn counterpart(&self) -> &ViewKey {
        &self.counterpart
    }

    /// Returns the cache.
    #[must_use]
    pub const fn cache(&self) -> &LocalTaskCache<S, C> {
        &self.cache
    }

    /// Returns the cache for direct mutation (add, edit, remove, refresh).
    pub const fn cache_mut(&mut self) -> &mut LocalTaskCache<S, C> {
        &mut self.cache
    }

    /// Consumes the transition pending for this view, if any, and applies it
    /// to the cache. Returns the applied record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Relay`] when the relay is unavailable.
    pub fn activate(&mut self) -> SessionResult<Option<TransitionRecord>> {
        let Some(record) = self.relay.consume(&self.key)? else {
            debug!(view = %self.key, "activated without pending transition");
            return Ok(None);
        };
        info!(view = %self.key, task_id = %record.task().id(), "applying relayed transition");
        self.cache.absorb_transition(record.clone());
        Ok(Some(record))
    }

    /// Completes a task and hands it to the counterpart view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transition`] when the move fails; an unsynced
    /// move is published before the error is returned, or
    /// [`SessionError::Unpublished`] when that publish fails.
    pub async fn complete(&mut self, id: &TaskId) -> SessionResult<TransitionRecord> {
        let outcome = self.cache.complete(id).await;
        self.hand_off(outcome)
    }

    /// Reopens a task and hands it to the counterpart view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transition`] when the move fails; an unsynced
    /// move is published before the error is returned.
    pub async fn reopen(&mut self, id: &TaskId) -> SessionResult<TransitionRecord> {
        let outcome = self.cache.reopen(id).await;
        self.hand_off(outcome)
    }

    /// Applies an edit, completes the task, and hands it off.
    ///
    /// # Errors
    ///
    /// As [`Self::complete`]; a failed edit moves and publishes nothing.
    pub async fn edit_then_complete(
        &mut self,
        id: &TaskId,
        title: &str,
        description: &str,
    ) -> SessionResult<TransitionRecord> {
        let outcome = self.cache.edit_then_complete(id, title, description).await;
        self.hand_off(outcome)
    }

    /// Applies an edit, reopens the task, and hands it off.
    ///
    /// # Errors
    ///
    /// As [`Self::reopen`]; a failed edit moves and publishes nothing.
    pub async fn edit_then_reopen(
        &mut self,
        id: &TaskId,
        title: &str,
        description: &str,
    ) -> SessionResult<TransitionRecord> {
        let outcome = self.cache.edit_then_reopen(id, title, description).await;
        self.hand_off(outcome)
    }

    fn hand_off(
        &self,
        outcome: Result<TransitionRecord, TransitionError>,
    ) -> SessionResult<TransitionRecord> {
        match outcome {
            Ok(record) => {
                self.relay.publish(&self.counterpart, record.clone())?;
                Ok(record)
            }
            Err(err) => {
                let Some(record) = err.committed() else {
                    return Err(err.into());
                };
                if let Err(relay) = self.relay.publish(&self.counterpart, record.clone()) {
                    warn!(
                        view = %self.key,
                        error = %err,
                        relay_error = %relay,
                        "unsynced transition could not be published"
                    );
                    return Err(SessionError::Unpublished {
                        transition: err,
                        relay,
                    });
                }
                Err(err.into())
            }
        }
    }
}
