//! Metrics Transport Port - Remote Exporter Call Interface
//!
//! One synchronous call per endpoint: given a target of the form
//! `protocol://host:port?scope=remote&cache=true` and a metric group,
//! return the exporter's raw textual payload. The concrete wire
//! protocol is an adapter concern and pluggable.

use async_trait::async_trait;

/// Trait for remote metrics exporter transports.
#[async_trait]
pub trait MetricsTransport: Send + Sync + 'static {
  /// Call the exporter at `target`, passing `group` as the sole
  /// argument, and return its raw response text.
  ///
  /// # Errors
  /// Returns error if the target is malformed, unreachable, or the
  /// exporter reports a call-level failure.
  async fn invoke(&self, target: &str, group: &str) -> anyhow::Result<String>;
}
