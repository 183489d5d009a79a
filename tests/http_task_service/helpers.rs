//! Shared helpers for HTTP adapter tests.

use rstest::fixture;
use tasksync::task::adapters::http::{HttpTaskService, HttpTaskServiceConfig};
use wiremock::MockServer;

/// Path prefix the mock server serves the API under.
pub const API_ROOT: &str = "/todo_api";

/// Starts a mock server for one test.
#[fixture]
pub async fn server() -> MockServer {
    MockServer::start().await
}

/// Builds an adapter pointed at `server`.
///
/// # Errors
///
/// Returns an error if the adapter cannot be configured.
pub fn service_for(server: &MockServer) -> Result<HttpTaskService, eyre::Report> {
    let config = HttpTaskServiceConfig::new(format!("{}{API_ROOT}", server.uri()))
        .with_timeout_secs(5)
        .with_user_agent("tasksync-tests");
    Ok(HttpTaskService::new(&config)?)
}

/// Returns the full request path for an API-relative `path`.
#[must_use]
pub fn api_path(path: &str) -> String {
    format!("{API_ROOT}{path}")
}
