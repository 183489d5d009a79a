//! Configuration for the HTTP task service adapter.

use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the task service.
pub const DEFAULT_BASE_URL: &str = "http://localhost/todo_api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors returned while building the HTTP adapter from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL, or an endpoint joined onto it, is not a valid URL.
    #[error("invalid task service URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The base URL does not use `http` or `https`.
    #[error("task service URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    /// The timeout is zero.
    #[error("task service timeout must be greater than zero")]
    ZeroTimeout,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Paths of the task service endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    /// `GET` returning the active tasks.
    pub list_active: String,
    /// `GET` returning the completed tasks.
    pub list_completed: String,
    /// `POST` creating a task.
    pub create: String,
    /// `POST` changing a task status.
    pub set_status: String,
    /// `POST` deleting a task.
    pub delete: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            list_active: "/tasks".to_owned(),
            list_completed: "/tasks/completed".to_owned(),
            create: "/tasks".to_owned(),
            set_status: "/tasks/status".to_owned(),
            delete: "/tasks/delete".to_owned(),
        }
    }
}

/// Settings for [`super::HttpTaskService`].
///
/// Deserialisable so hosts can load it from whatever settings source they
/// use; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpTaskServiceConfig {
    /// Base URL that endpoint paths are appended to.
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional `User-Agent` header value.
    pub user_agent: Option<String>,
    /// Endpoint paths.
    pub endpoints: EndpointPaths,
}

impl Default for HttpTaskServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            endpoints: EndpointPaths::default(),
        }
    }
}

impl HttpTaskServiceConfig {
    /// Creates a configuration for `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replaces the endpoint paths.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointPaths) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Returns the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when the timeout is zero.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    /// Resolves every endpoint against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] or [`ConfigError::UnsupportedScheme`]
    /// when a URL cannot be used.
    pub fn resolve(&self) -> Result<ResolvedEndpoints, ConfigError> {
        let base = parse_url(&self.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }
        let root = self.base_url.trim_end_matches('/');
        let join = |path: &str| parse_url(&format!("{root}/{}", path.trim_start_matches('/')));
        Ok(ResolvedEndpoints {
            list_active: join(&self.endpoints.list_active)?,
            list_completed: join(&self.endpoints.list_completed)?,
            create: join(&self.endpoints.create)?,
            set_status: join(&self.endpoints.set_status)?,
            delete: join(&self.endpoints.delete)?,
        })
    }
}

fn parse_url(text: &str) -> Result<Url, ConfigError> {
    Url::parse(text).map_err(|err| ConfigError::InvalidUrl {
        url: text.to_owned(),
        reason: err.to_string(),
    })
}

/// Absolute endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    /// Active task listing.
    pub list_active: Url,
    /// Completed task listing.
    pub list_completed: Url,
    /// Task creation.
    pub create: Url,
    /// Status change.
    pub set_status: Url,
    /// Deletion.
    pub delete: Url,
}
