//! Application services for the task lifecycle.
//!
//! [`LocalTaskCache`] owns the partitions of one view session; its
//! transition methods (`complete`, `reopen`, and the edit-then-move
//! variants) live in the `transition` module.

mod cache;
mod transition;

pub use cache::{CacheError, CacheResult, LocalTaskCache, OfflineTaskCache, SharedTaskCache};
pub use transition::{TransitionError, TransitionResult};
