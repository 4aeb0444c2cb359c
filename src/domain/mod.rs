//! Domain layer - Core aggregation models and logic.
//!
//! Pure types and functions for the metrics-aggregation pipeline.
//! No external dependencies allowed here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod endpoint;
pub mod error;
pub mod identity;
pub mod metric;
pub mod registration;

// Re-export core types for convenience
pub use endpoint::ServiceEndpoint;
pub use error::GatewayError;
pub use identity::{classify, Classified};
pub use metric::MetricRecord;
pub use registration::{RegistrationEntry, ServiceIdentifier, Side};
