//! Metadata Store Port - Runtime Parameter Lookup Interface
//!
//! Maps a fully-qualified service identifier to the parameter bag the
//! instance published at registration time. The resolver only cares
//! about two keys: the metrics exporter's port and wire protocol.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::registration::ServiceIdentifier;

/// Parameter name carrying the metrics exporter port.
pub const METRICS_PORT: &str = "metrics.port";

/// Parameter name carrying the metrics exporter wire protocol.
pub const METRICS_PROTOCOL: &str = "metrics.protocol";

/// Published runtime parameters of one service instance.
pub type ParameterBag = HashMap<String, String>;

/// Trait for metadata-store backends.
///
/// Provider and consumer metadata live under different keyspaces in
/// every store we target, hence the two variants. A bag lacking the
/// metrics keys is not an error; the resolver emits the endpoint with
/// empty fields and lets the fetch stage fail it.
#[async_trait]
pub trait MetadataStore: Send + Sync + 'static {
  /// Parameter bag published by a provider-side instance.
  async fn provider_metadata(&self, id: &ServiceIdentifier) -> anyhow::Result<ParameterBag>;

  /// Parameter bag published by a consumer-side instance.
  async fn consumer_metadata(&self, id: &ServiceIdentifier) -> anyhow::Result<ParameterBag>;
}
