//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    name = %config.gateway.name,
    bind = %config.server.bind_address,
    directory = %config.directory.base_url,
    max_concurrent = config.fetch.max_concurrent,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.gateway.name.is_empty(),
    "Gateway name must not be empty"
  );
  anyhow::ensure!(
    config.server.bind_address.parse::<std::net::SocketAddr>().is_ok(),
    "server.bind_address is not a valid socket address: {}",
    config.server.bind_address
  );
  anyhow::ensure!(
    !config.directory.base_url.is_empty(),
    "directory.base_url must not be empty"
  );
  anyhow::ensure!(
    config.directory.timeout_ms > 0,
    "directory.timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.fetch.max_concurrent > 0,
    "fetch.max_concurrent must be positive, got {}",
    config.fetch.max_concurrent
  );
  anyhow::ensure!(
    config.fetch.deadline_ms > 0,
    "fetch.deadline_ms must be positive"
  );
  anyhow::ensure!(
    !config.probe.target.is_empty(),
    "probe.target must not be empty"
  );
  Ok(())
}
