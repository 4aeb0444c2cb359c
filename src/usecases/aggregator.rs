//! Metrics Aggregator - Resolve, Fan Out, Merge
//!
//! The full query pipeline: resolve the token into endpoints, call
//! every exporter concurrently (bounded by a semaphore so a large
//! service does not get hammered all at once), and merge the results
//! in endpoint-discovery order so output stays deterministic no matter
//! which call finishes first.
//!
//! One endpoint's transport or parse failure never aborts its
//! siblings. Under the default `Degrade` policy the outcome carries
//! both the merged records and a per-endpoint failure report; under
//! `Fail` any endpoint failure fails the whole call. Resolution
//! failures are always fatal.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::config::{AppConfig, FailurePolicy};
use crate::domain::endpoint::ServiceEndpoint;
use crate::domain::error::GatewayError;
use crate::domain::metric::MetricRecord;
use crate::ports::metadata::MetadataStore;
use crate::ports::registry::Registry;
use crate::ports::topology::{RelationGraph, TopologyService};
use crate::ports::transport::MetricsTransport;

use super::fetcher::MetricsFetcher;
use super::resolver::EndpointResolver;

/// One endpoint that failed during fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointFailure {
  /// Registered address of the failing endpoint.
  pub address: String,
  /// Exporter port that was dialed (may be empty, see resolver).
  pub port: String,
  /// Pipeline stage that failed: "transport" or "parse".
  pub stage: String,
  /// Human-readable cause.
  pub error: String,
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateOutcome {
  /// Merged records, endpoint-discovery order, exporter order within
  /// one endpoint's contribution.
  pub records: Vec<MetricRecord>,
  /// Endpoints whose fetch failed (empty under full success).
  pub failures: Vec<EndpointFailure>,
}

/// Orchestrates the resolve -> fetch -> merge pipeline.
pub struct MetricsAggregator<R, M, T, P>
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  /// Endpoint discovery.
  resolver: EndpointResolver<R, M>,
  /// Per-endpoint fetch.
  fetcher: Arc<MetricsFetcher<T>>,
  /// Relation-graph backend (pure delegation).
  topology: Arc<P>,
  /// Fan-out concurrency bound.
  semaphore: Arc<Semaphore>,
  /// Per-endpoint call deadline.
  deadline: Duration,
  /// What one endpoint's failure does to the whole call.
  failure_policy: FailurePolicy,
  /// Fixed target for the narrow probe operation.
  probe_target: String,
}

impl<R, M, T, P> MetricsAggregator<R, M, T, P>
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  /// Wire the aggregator from its collaborators and configuration.
  pub fn new(
    registry: Arc<R>,
    metadata: Arc<M>,
    transport: Arc<T>,
    topology: Arc<P>,
    config: &AppConfig,
  ) -> Self {
    Self {
      resolver: EndpointResolver::new(registry, metadata),
      fetcher: Arc::new(MetricsFetcher::new(transport)),
      topology,
      semaphore: Arc::new(Semaphore::new(config.fetch.max_concurrent)),
      deadline: Duration::from_millis(config.fetch.deadline_ms),
      failure_policy: config.fetch.failure_policy,
      probe_target: config.probe.target.clone(),
    }
  }

  /// Run the full aggregation for `token` and `group`.
  ///
  /// Total record count equals the sum of per-endpoint fetch lengths
  /// over the successful endpoints; merge order is stable by endpoint
  /// discovery index, never by completion time.
  ///
  /// # Errors
  /// Classification and resolution errors always fail the call. Under
  /// `FailurePolicy::Fail`, the first endpoint failure (in discovery
  /// order) does too.
  #[instrument(skip(self), fields(token = %token, group = %group))]
  pub async fn aggregate(&self, token: &str, group: &str) -> Result<AggregateOutcome, GatewayError> {
    let endpoints = self.resolver.resolve(token).await?;

    info!(endpoints = endpoints.len(), "Fanning out exporter calls");

    let tasks: Vec<_> = endpoints
      .into_iter()
      .map(|endpoint| {
        let fetcher = Arc::clone(&self.fetcher);
        let semaphore = Arc::clone(&self.semaphore);
        let group = group.to_string();
        let deadline = self.deadline;
        tokio::spawn(async move {
          let result = tokio::time::timeout(deadline, async {
            let _permit = semaphore
              .acquire_owned()
              .await
              .map_err(|e| GatewayError::Transport(e.into()))?;
            fetcher.fetch(&endpoint, &group).await
          })
          .await
          .unwrap_or_else(|_| {
            // The deadline also covers time spent waiting for a
            // fan-out permit, so the call may never have been dialed.
            Err(GatewayError::Transport(anyhow::anyhow!(
              "deadline of {}ms exceeded while queued or in flight",
              deadline.as_millis()
            )))
          });
          (endpoint, result)
        })
      })
      .collect();

    // join_all preserves spawn order, which is discovery order.
    let mut outcome = AggregateOutcome::default();
    for joined in join_all(tasks).await {
      let (endpoint, result) = match joined {
        Ok(pair) => pair,
        Err(e) => {
          // A fetch task panicked or was cancelled.
          warn!(error = %e, "Fetch task aborted");
          return Err(GatewayError::Transport(e.into()));
        }
      };
      match result {
        Ok(records) => outcome.records.extend(records),
        Err(err) => {
          warn!(address = %endpoint.address, stage = err.stage(), error = %err, "Endpoint fetch failed");
          if self.failure_policy == FailurePolicy::Fail {
            return Err(err);
          }
          outcome.failures.push(failure_report(&endpoint, &err));
        }
      }
    }

    info!(
      records = outcome.records.len(),
      failed_endpoints = outcome.failures.len(),
      "Aggregation complete"
    );
    Ok(outcome)
  }

  /// Readiness of the pipeline: without a healthy registry,
  /// resolution can only fail.
  pub async fn is_ready(&self) -> bool {
    self.resolver.registry_healthy().await
  }

  /// Current application-relation graph. Pure delegation to the
  /// topology backend, no orchestration of its own.
  pub async fn application_relation(&self) -> Result<RelationGraph, GatewayError> {
    self
      .topology
      .application_relation()
      .await
      .map_err(GatewayError::Transport)
  }

  /// One raw call against the configured fixed probe target.
  ///
  /// Deliberately narrow: not folded into the general pipeline, the
  /// probe target comes from config and the response is returned as-is.
  pub async fn probe(&self, group: &str) -> Result<String, GatewayError> {
    self.fetcher.probe_raw(&self.probe_target, group).await
  }
}

fn failure_report(endpoint: &ServiceEndpoint, err: &GatewayError) -> EndpointFailure {
  let mut cause = err.to_string();
  if let Some(source) = std::error::Error::source(err) {
    cause.push_str(": ");
    cause.push_str(&source.to_string());
  }
  EndpointFailure {
    address: endpoint.address.clone(),
    port: endpoint.port.clone(),
    stage: err.stage().to_string(),
    error: cause,
  }
}
