//! Metric Record - Opaque Exporter Payload with Provenance
//!
//! Exporters return a JSON array of metric objects whose shape the
//! gateway does not interpret; everything except the `ip` field rides
//! along untouched via `serde(flatten)`. After a fetch, `ip` is always
//! overwritten with the resolved endpoint's address so provenance
//! reflects the registry's view, never the exporter's self-report.

use serde::{Deserialize, Serialize};

/// One metric sample as returned by a remote exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
  /// Source address of the endpoint this record came from. Overwritten
  /// by the fetch stage; never trusted from the wire.
  #[serde(default)]
  pub ip: String,
  /// Everything else the exporter reported, preserved verbatim.
  #[serde(flatten)]
  pub payload: serde_json::Map<String, serde_json::Value>,
}

impl MetricRecord {
  /// Stamp this record with the address of the endpoint it came from.
  pub fn tag_source(&mut self, address: &str) {
    self.ip = address.to_string();
  }
}
