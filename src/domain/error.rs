//! Gateway Error Taxonomy
//!
//! One variant per pipeline stage. Resolution failures are fatal to a
//! whole aggregation (there is nothing to query); transport and parse
//! failures are scoped to a single endpoint and recorded per-endpoint
//! by the aggregator instead of aborting sibling fetches.

use thiserror::Error;

/// Errors produced by the discovery/fetch/merge pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
  /// The lookup token is empty or otherwise unusable.
  #[error("cannot classify lookup token {0:?}")]
  Classification(String),

  /// Registry or metadata-store lookup failed.
  #[error("endpoint resolution failed")]
  Resolution(#[source] anyhow::Error),

  /// The remote exporter was unreachable or returned a call-level error.
  #[error("metrics exporter call failed")]
  Transport(#[source] anyhow::Error),

  /// The exporter responded, but not with a JSON array of metric objects.
  #[error("metrics exporter returned an unparseable payload")]
  Parse(#[source] anyhow::Error),
}

impl GatewayError {
  /// Short stage tag used in per-endpoint failure reports and logs.
  pub fn stage(&self) -> &'static str {
    match self {
      Self::Classification(_) => "classification",
      Self::Resolution(_) => "resolution",
      Self::Transport(_) => "transport",
      Self::Parse(_) => "parse",
    }
  }
}
