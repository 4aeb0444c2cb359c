//! Mesh Metrics Gateway — Entry Point
//!
//! Initializes configuration, logging, backend clients, and the
//! admin-console API server. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create DirectoryClient (registry + metadata + topology ports)
//! 4. Create HttpMetricsTransport (exporter calls)
//! 5. Wire MetricsAggregator (resolve -> bounded fan-out -> merge)
//! 6. Serve the axum API until SIGINT -> graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::directory::{DirectoryClient, DirectoryClientConfig};
use adapters::exporter::{ExporterClientConfig, HttpMetricsTransport};
use usecases::aggregator::MetricsAggregator;

#[tokio::main]
async fn main() -> Result<()> {
  // ── 1. Load configuration from config.toml ──────────────
  let config = config::loader::load_config("config.toml")
    .context("Failed to load configuration")?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.gateway.log_level)),
    )
    .json()
    .init();

  info!(
    name = %config.gateway.name,
    version = env!("CARGO_PKG_VERSION"),
    bind = %config.server.bind_address,
    "Starting mesh metrics gateway"
  );

  // ── 3. Directory console client (registry/metadata/topology) ──
  let directory = Arc::new(
    DirectoryClient::new(DirectoryClientConfig {
      base_url: config.directory.base_url.clone(),
      timeout: Duration::from_millis(config.directory.timeout_ms),
    })
    .context("Failed to create directory client")?,
  );

  // ── 4. Exporter transport ───────────────────────────────
  let transport = Arc::new(
    HttpMetricsTransport::new(ExporterClientConfig {
      timeout: Duration::from_millis(config.fetch.deadline_ms),
      ..ExporterClientConfig::default()
    })
    .context("Failed to create exporter transport")?,
  );

  // ── 5. Wire the aggregation pipeline ────────────────────
  let aggregator = Arc::new(MetricsAggregator::new(
    Arc::clone(&directory),
    Arc::clone(&directory),
    transport,
    Arc::clone(&directory),
    &config,
  ));

  // ── 6. Serve until SIGINT ───────────────────────────────
  let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

  let app = adapters::http::router(aggregator);
  let bind = config.server.bind_address.clone();
  let server_shutdown = shutdown_tx.subscribe();
  let server_handle = tokio::spawn(async move {
    if let Err(e) = adapters::http::serve(&bind, app, server_shutdown).await {
      error!(error = %e, "API server task failed");
    }
  });

  info!("Gateway is running");

  signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
  info!("SIGINT received, initiating graceful shutdown");

  let _ = shutdown_tx.send(());
  let _ = tokio::time::timeout(Duration::from_secs(10), server_handle).await;

  info!("Shutdown complete");
  Ok(())
}
