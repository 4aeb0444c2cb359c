//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the gateway's core workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `EndpointResolver`: token -> every metrics-capable endpoint
//! - `MetricsFetcher`: one exporter call, parsed and provenance-tagged
//! - `MetricsAggregator`: resolve -> bounded fan-out -> ordered merge

pub mod aggregator;
pub mod fetcher;
pub mod resolver;
