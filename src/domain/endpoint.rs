//! Service Endpoint - One Reachable Metrics Exporter
//!
//! A resolved `(address, port, protocol, service)` tuple naming the
//! embedded metrics exporter of a single provider or consumer instance.
//! Constructed fresh on every resolution; a pure value type with no
//! identity beyond its fields. Duplicates are legal and preserved.

use serde::{Deserialize, Serialize};

/// One network-reachable metrics exporter.
///
/// `port` and `protocol` come from the instance's metadata parameters
/// and may be empty when the instance never published them; resolution
/// emits the endpoint anyway and leaves the problem to the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
  /// Registered instance address, typically `host:port` of the service
  /// itself (not of the exporter).
  pub address: String,
  /// Exporter port from the `metrics.port` metadata parameter.
  pub port: String,
  /// Exporter wire protocol from the `metrics.protocol` parameter.
  pub protocol: String,
  /// Owning service identifier string.
  pub service_name: String,
}

impl ServiceEndpoint {
  /// Host part of the registered address, with any `:port` suffix of
  /// the service address stripped. The exporter listens on its own
  /// port, so dialing always combines this host with `self.port`.
  pub fn host(&self) -> &str {
    self.address.split(':').next().unwrap_or(&self.address)
  }

  /// Transport target for this exporter, with the fixed query selecting
  /// remote scope and response caching.
  pub fn exporter_target(&self) -> String {
    format!(
      "{}://{}:{}?scope=remote&cache=true",
      self.protocol,
      self.host(),
      self.port
    )
  }
}
