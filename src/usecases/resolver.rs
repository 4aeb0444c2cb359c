//! Endpoint Resolver - Token to Metrics-Exporter Discovery
//!
//! Turns a caller-supplied token (IPv4 address or service name) into
//! the full set of metrics-capable endpoints registered under that
//! identity, providers first, then consumers, registry order preserved.
//!
//! Lookup asymmetry, kept on purpose: provider rows are keyed by the
//! token's classification, consumer rows are always keyed by address.
//! The upstream console has always behaved this way and dashboards
//! depend on it; flagged for product-owner confirmation in DESIGN.md
//! rather than silently changed.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::endpoint::ServiceEndpoint;
use crate::domain::error::GatewayError;
use crate::domain::identity::{classify, Classified};
use crate::domain::registration::{RegistrationEntry, ServiceIdentifier, Side};
use crate::ports::metadata::{MetadataStore, ParameterBag, METRICS_PORT, METRICS_PROTOCOL};
use crate::ports::registry::Registry;

/// Resolves lookup tokens into metrics-exporter endpoints.
pub struct EndpointResolver<R: Registry, M: MetadataStore> {
  /// Live registration lookup.
  registry: Arc<R>,
  /// Runtime parameter lookup.
  metadata: Arc<M>,
}

impl<R: Registry, M: MetadataStore> EndpointResolver<R, M> {
  /// Create a new resolver over the given backends.
  pub fn new(registry: Arc<R>, metadata: Arc<M>) -> Self {
    Self { registry, metadata }
  }

  /// Resolve every metrics endpoint registered under `token`.
  ///
  /// Output is exactly the union of matching provider registrations
  /// and consumer registrations at that address, in discovery order,
  /// without deduplication. Registrations whose metadata lacks the
  /// metrics parameters still yield an endpoint with empty port and
  /// protocol; the fetch stage deals with those.
  ///
  /// # Errors
  /// `GatewayError::Classification` for an empty token,
  /// `GatewayError::Resolution` when the registry or metadata store
  /// fails. Resolution errors are fatal: with no endpoint set there is
  /// nothing to aggregate.
  #[instrument(skip(self), fields(token = %token))]
  pub async fn resolve(&self, token: &str) -> Result<Vec<ServiceEndpoint>, GatewayError> {
    let token = token.trim();
    let classified = classify(token)?;

    let providers = match classified {
      Classified::Address => self.registry.find_registrations_by_address(token).await,
      Classified::ServiceName => self.registry.find_registrations_by_service(token).await,
    }
    .map_err(GatewayError::Resolution)?;

    // Consumer lookup is always address-keyed, regardless of how the
    // token classified. See the module doc.
    let consumers = self
      .registry
      .find_consumers_by_address(token)
      .await
      .map_err(GatewayError::Resolution)?;

    debug!(
      providers = providers.len(),
      consumers = consumers.len(),
      ?classified,
      "Registrations discovered"
    );

    let mut endpoints = Vec::with_capacity(providers.len() + consumers.len());
    for entry in &providers {
      let id = ServiceIdentifier::for_entry(entry, Side::Provider);
      let bag = self
        .metadata
        .provider_metadata(&id)
        .await
        .map_err(GatewayError::Resolution)?;
      endpoints.push(endpoint_from(entry, &bag));
    }
    for entry in &consumers {
      let id = ServiceIdentifier::for_entry(entry, Side::Consumer);
      let bag = self
        .metadata
        .consumer_metadata(&id)
        .await
        .map_err(GatewayError::Resolution)?;
      endpoints.push(endpoint_from(entry, &bag));
    }

    Ok(endpoints)
  }

  /// Whether the registry backend currently answers health checks.
  pub async fn registry_healthy(&self) -> bool {
    self.registry.is_healthy().await
  }
}

/// Build the endpoint for one registration row. Missing metrics
/// parameters become empty strings; the row is never dropped.
fn endpoint_from(entry: &RegistrationEntry, bag: &ParameterBag) -> ServiceEndpoint {
  ServiceEndpoint {
    address: entry.address.clone(),
    port: bag.get(METRICS_PORT).cloned().unwrap_or_default(),
    protocol: bag.get(METRICS_PROTOCOL).cloned().unwrap_or_default(),
    service_name: entry.service.clone(),
  }
}
