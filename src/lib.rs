//! Library exports for reuse in integration tests.
/// Conversion-rate data model and HTTP collaborator.
pub mod api;
/// Application directory helpers.
pub mod app_dirs;
/// Persisted application configuration.
pub mod config;
/// Dashboard controller and egui UI modules.
pub mod dashboard;
/// Shared HTTP client configuration.
pub mod http_client;
/// Logging setup.
pub mod logging;
