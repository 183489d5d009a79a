//! Shared test helpers for in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tasksync::task::{
    adapters::memory::InMemoryTaskService,
    domain::{Task, TaskStatus},
    services::LocalTaskCache,
};

/// Cache type used throughout the in-memory tests.
pub type MemoryCache = LocalTaskCache<InMemoryTaskService, DefaultClock>;

/// Provides a fresh in-memory task service for each test.
#[fixture]
pub fn service() -> InMemoryTaskService {
    InMemoryTaskService::new()
}

/// Builds a cache talking to `service`.
#[must_use]
pub fn cache_for(service: &InMemoryTaskService) -> MemoryCache {
    LocalTaskCache::with_remote(Arc::new(service.clone()), Arc::new(DefaultClock))
}

/// Seeds `titles` into the service with `status`.
///
/// # Errors
///
/// Returns an error if the service lock is poisoned.
pub fn seed(
    service: &InMemoryTaskService,
    titles: &[&str],
    status: TaskStatus,
) -> Result<Vec<Task>, eyre::Report> {
    titles
        .iter()
        .map(|title| {
            service
                .seed(*title, "", status)
                .map_err(eyre::Report::from)
        })
        .collect()
}

/// Returns the titles of `tasks` in order.
#[must_use]
pub fn titles(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|task| task.title().to_owned()).collect()
}
