//! API Server - Bind, Serve, Graceful Shutdown
//!
//! Thin wrapper around `axum::serve` that ties the router to the
//! configured bind address and drains in-flight requests when the
//! shutdown broadcast fires.

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::broadcast;
use tracing::info;

/// Serve `app` on `bind_address` until the shutdown signal fires.
pub async fn serve(
  bind_address: &str,
  app: Router,
  mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
  let listener = tokio::net::TcpListener::bind(bind_address)
    .await
    .with_context(|| format!("Failed to bind {bind_address}"))?;

  info!(address = %bind_address, "API server started");

  axum::serve(listener, app)
    .with_graceful_shutdown(async move {
      let _ = shutdown_rx.recv().await;
    })
    .await
    .context("API server failed")?;

  Ok(())
}
