//! API Routes - Aggregation Pipeline HTTP Surface
//!
//! Three operations, mounted under `/api/{env}`:
//! - `POST /api/{env}/metrics?group=`        fixed-target probe, raw text back
//! - `GET  /api/{env}/metrics/relation`      application-relation graph
//! - `GET  /api/{env}/metrics/ipAddr?ip=&group=`  full aggregation
//!
//! Plus `/live` and `/ready` for orchestrator probes: liveness is the
//! process itself, readiness additionally requires a registry that
//! answers health checks.
//!
//! Under the default degrade policy, partial failure is a 200 carrying
//! both the merged records and the per-endpoint failure report; only
//! classification (400) and whole-pipeline failures (502) map to error
//! statuses.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::error::GatewayError;
use crate::ports::metadata::MetadataStore;
use crate::ports::registry::Registry;
use crate::ports::topology::TopologyService;
use crate::ports::transport::MetricsTransport;
use crate::usecases::aggregator::MetricsAggregator;

/// Query string for the probe operation.
#[derive(Debug, Deserialize)]
pub struct GroupQuery {
  /// Metric group to request.
  pub group: String,
}

/// Query string for the aggregation operation.
#[derive(Debug, Deserialize)]
pub struct IpAddrQuery {
  /// Lookup token: IPv4 address or service name.
  pub ip: String,
  /// Metric group to request.
  pub group: String,
}

/// Build the API router over a wired aggregator.
pub fn router<R, M, T, P>(aggregator: Arc<MetricsAggregator<R, M, T, P>>) -> Router
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  Router::new()
    .route("/api/:env/metrics", post(probe::<R, M, T, P>))
    .route("/api/:env/metrics/relation", get(relation::<R, M, T, P>))
    .route("/api/:env/metrics/ipAddr", get(ip_addr::<R, M, T, P>))
    .route("/live", get(|| async { StatusCode::OK }))
    .route("/ready", get(readiness::<R, M, T, P>))
    .with_state(aggregator)
}

/// Readiness probe: 200 only while the registry answers health checks.
async fn readiness<R, M, T, P>(
  State(gateway): State<Arc<MetricsAggregator<R, M, T, P>>>,
) -> Response
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  if gateway.is_ready().await {
    (StatusCode::OK, "READY").into_response()
  } else {
    (StatusCode::SERVICE_UNAVAILABLE, "NOT READY").into_response()
  }
}

/// Fixed-target probe: one raw exporter call, text straight back.
async fn probe<R, M, T, P>(
  State(gateway): State<Arc<MetricsAggregator<R, M, T, P>>>,
  Path(env): Path<String>,
  Query(query): Query<GroupQuery>,
) -> Response
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  info!(%env, group = %query.group, "Probe requested");
  match gateway.probe(&query.group).await {
    Ok(text) => (StatusCode::OK, text).into_response(),
    Err(err) => error_response(&err),
  }
}

/// Application-relation graph, delegated wholesale.
async fn relation<R, M, T, P>(
  State(gateway): State<Arc<MetricsAggregator<R, M, T, P>>>,
  Path(env): Path<String>,
) -> Response
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  info!(%env, "Relation graph requested");
  match gateway.application_relation().await {
    Ok(graph) => Json(graph).into_response(),
    Err(err) => error_response(&err),
  }
}

/// Full aggregation for a token and group.
async fn ip_addr<R, M, T, P>(
  State(gateway): State<Arc<MetricsAggregator<R, M, T, P>>>,
  Path(env): Path<String>,
  Query(query): Query<IpAddrQuery>,
) -> Response
where
  R: Registry,
  M: MetadataStore,
  T: MetricsTransport,
  P: TopologyService,
{
  info!(%env, token = %query.ip, group = %query.group, "Aggregation requested");
  match gateway.aggregate(&query.ip, &query.group).await {
    Ok(outcome) => Json(outcome).into_response(),
    Err(err) => error_response(&err),
  }
}

/// Map pipeline errors to HTTP statuses.
fn error_response(err: &GatewayError) -> Response {
  let status = match err {
    GatewayError::Classification(_) => StatusCode::BAD_REQUEST,
    GatewayError::Resolution(_) | GatewayError::Transport(_) | GatewayError::Parse(_) => {
      StatusCode::BAD_GATEWAY
    }
  };
  error!(stage = err.stage(), error = %err, "Request failed");
  (status, err.to_string()).into_response()
}
