//! Exporter HTTP Client - One-shot Metrics Exporter Calls
//!
//! Wraps reqwest with a per-call timeout and bounded retries for the
//! single call the fetch stage makes per endpoint. The client is
//! shared; each call acquires no state beyond its request, so every
//! exit path (success, error, timeout) releases everything it held.
//!
//! Targets arrive as `protocol://host:port?scope=remote&cache=true`.
//! Mesh-native scheme names (dubbo, tri, ...) are dialed as plain HTTP;
//! the exporter embedded in every instance speaks HTTP regardless of
//! the RPC protocol the instance serves.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::transport::MetricsTransport;

/// Configuration for the exporter HTTP client.
#[derive(Debug, Clone)]
pub struct ExporterClientConfig {
  /// Per-request timeout.
  pub timeout: Duration,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for ExporterClientConfig {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(5),
      max_retries: 2,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

/// HTTP-backed implementation of the `MetricsTransport` port.
pub struct HttpMetricsTransport {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: ExporterClientConfig,
}

impl HttpMetricsTransport {
  /// Create a new transport.
  pub fn new(config: ExporterClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  async fn get_text(&self, url: &str, group: &str) -> Result<String> {
    let mut last_error = None;

    for attempt in 0..=self.config.max_retries {
      if attempt > 0 {
        let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
        debug!(attempt, delay_ms = delay.as_millis(), "Retrying exporter call");
        sleep(delay).await;
      }

      // .query() percent-encodes the caller-supplied group.
      match self.http.get(url).query(&[("group", group)]).send().await {
        Ok(response) => {
          let status = response.status();
          if status.is_success() {
            return response.text().await.context("Failed to read exporter response body");
          }
          if status.is_server_error() {
            warn!(status = %status, "Exporter server error, retrying");
            last_error = Some(anyhow::anyhow!("exporter error {status}"));
            continue;
          }
          let body = response.text().await.unwrap_or_default();
          return Err(anyhow::anyhow!("exporter error {status}: {body}"));
        }
        Err(e) => {
          warn!(error = %e, attempt, "Exporter call failed");
          last_error = Some(e.into());
          continue;
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
  }
}

#[async_trait]
impl MetricsTransport for HttpMetricsTransport {
  async fn invoke(&self, target: &str, group: &str) -> Result<String> {
    let url = dial_url(target)?;
    self.get_text(&url, group).await
  }
}

/// Rewrite an exporter target into the URL actually dialed.
///
/// Non-HTTP schemes map to `http`; `group` is appended separately at
/// request time so it gets percent-encoded. Targets the resolver
/// emitted from incomplete metadata (empty host or port) are rejected
/// here, surfacing the missing parameters as a transport error on this
/// one endpoint.
fn dial_url(target: &str) -> Result<String> {
  let (scheme, rest) = target
    .split_once("://")
    .with_context(|| format!("malformed exporter target: {target}"))?;

  let (authority, query) = match rest.split_once('?') {
    Some((authority, query)) => (authority, query),
    None => (rest, ""),
  };

  let (host, port) = authority
    .split_once(':')
    .with_context(|| format!("exporter target missing port: {target}"))?;
  anyhow::ensure!(!host.is_empty(), "exporter target missing host: {target}");
  anyhow::ensure!(!port.is_empty(), "exporter target missing port: {target}");

  let scheme = match scheme {
    "http" | "https" => scheme,
    "" => anyhow::bail!("exporter target missing protocol: {target}"),
    _ => "http",
  };

  let mut url = format!("{scheme}://{host}:{port}/metrics");
  if !query.is_empty() {
    url.push('?');
    url.push_str(query);
  }
  Ok(url)
}
