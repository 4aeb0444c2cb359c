//! Exporter Transport Adapter
//!
//! HTTP implementation of the `MetricsTransport` port.

pub mod client;

pub use client::{ExporterClientConfig, HttpMetricsTransport};
