//! Configuration Module - TOML-based Gateway Configuration
//!
//! Loads and validates configuration from `config.toml`. Collaborator
//! endpoints, fan-out limits, and the fixed probe target are all
//! externalized here - nothing is hardcoded in the usecases layer.

pub mod loader;

use serde::Deserialize;

/// Top-level gateway configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the server starts listening.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Gateway identity and logging.
  pub gateway: GatewayConfig,
  /// HTTP server settings.
  pub server: ServerConfig,
  /// Registry / metadata / topology backend settings.
  pub directory: DirectoryConfig,
  /// Per-endpoint fetch fan-out settings.
  pub fetch: FetchConfig,
  /// Fixed-target probe settings.
  pub probe: ProbeConfig,
}

/// Gateway identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Bind address for the admin-console API.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
}

/// Backend connection configuration for the registry, metadata store,
/// and topology service (all served by the directory console).
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
  /// Base URL of the directory console API.
  pub base_url: String,
  /// Request timeout in milliseconds.
  #[serde(default = "default_directory_timeout_ms")]
  pub timeout_ms: u64,
}

/// What a single endpoint's failure does to the whole aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
  /// Return successful records plus a per-endpoint failure report.
  Degrade,
  /// Any endpoint failure fails the whole call.
  Fail,
}

/// Per-endpoint fetch fan-out configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
  /// Maximum exporter calls in flight at once.
  #[serde(default = "default_max_concurrent")]
  pub max_concurrent: usize,
  /// Per-endpoint call deadline in milliseconds.
  #[serde(default = "default_deadline_ms")]
  pub deadline_ms: u64,
  /// Partial-failure policy.
  #[serde(default = "default_failure_policy")]
  pub failure_policy: FailurePolicy,
}

/// Fixed-target probe configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
  /// Transport target probed by `POST /api/{env}/metrics`.
  #[serde(default = "default_probe_target")]
  pub target: String,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_directory_timeout_ms() -> u64 {
  10_000
}

fn default_max_concurrent() -> usize {
  8
}

fn default_deadline_ms() -> u64 {
  5_000
}

fn default_failure_policy() -> FailurePolicy {
  FailurePolicy::Degrade
}

fn default_probe_target() -> String {
  "dubbo://127.0.0.1:20880?scope=remote&cache=true".to_string()
}
