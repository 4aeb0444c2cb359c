//! Metrics Fetcher - One Exporter Call, Parsed and Tagged
//!
//! Performs exactly one transport call per resolved endpoint, parses
//! the textual response as a JSON array of metric objects, and stamps
//! every record with the endpoint's registered address. The stamp
//! overrides whatever the exporter reported about itself, so provenance
//! always matches the resolver's view of the mesh.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::endpoint::ServiceEndpoint;
use crate::domain::error::GatewayError;
use crate::domain::metric::MetricRecord;
use crate::ports::transport::MetricsTransport;

/// Fetches and parses one endpoint's metric samples.
pub struct MetricsFetcher<T: MetricsTransport> {
  /// Remote exporter transport.
  transport: Arc<T>,
}

impl<T: MetricsTransport> MetricsFetcher<T> {
  /// Create a new fetcher over the given transport.
  pub fn new(transport: Arc<T>) -> Self {
    Self { transport }
  }

  /// Call `endpoint`'s exporter for `group` and return its records,
  /// each tagged with the endpoint's address.
  ///
  /// # Errors
  /// `GatewayError::Transport` when the exporter is unreachable or
  /// errors, `GatewayError::Parse` when the response is not a JSON
  /// array of metric objects. The aggregator scopes both to the one
  /// endpoint; neither aborts sibling fetches.
  #[instrument(skip(self, endpoint), fields(address = %endpoint.address, group = %group))]
  pub async fn fetch(
    &self,
    endpoint: &ServiceEndpoint,
    group: &str,
  ) -> Result<Vec<MetricRecord>, GatewayError> {
    let target = endpoint.exporter_target();
    let raw = self
      .transport
      .invoke(&target, group)
      .await
      .map_err(GatewayError::Transport)?;

    let mut records: Vec<MetricRecord> =
      serde_json::from_str(&raw).map_err(|e| GatewayError::Parse(e.into()))?;

    for record in &mut records {
      record.tag_source(&endpoint.address);
    }

    debug!(records = records.len(), "Exporter response parsed");
    Ok(records)
  }

  /// Raw probe against an explicit target, response returned untouched.
  ///
  /// Used by the fixed-target probe operation only; the aggregation
  /// path always goes through [`Self::fetch`].
  pub async fn probe_raw(&self, target: &str, group: &str) -> Result<String, GatewayError> {
    self
      .transport
      .invoke(target, group)
      .await
      .map_err(GatewayError::Transport)
  }
}
