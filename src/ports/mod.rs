//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `Registry`: live provider/consumer registrations by address or service
//! - `MetadataStore`: per-service runtime parameter bags
//! - `MetricsTransport`: the one-shot call to a remote metrics exporter
//! - `TopologyService`: application-relation graph (pure delegation)

pub mod metadata;
pub mod registry;
pub mod topology;
pub mod transport;
