//! HTTP adapter for the task service port.

mod client;
pub mod config;
mod wire;

pub use client::HttpTaskService;
pub use config::{ConfigError, EndpointPaths, HttpTaskServiceConfig, ResolvedEndpoints};
