//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP clients, the admin-console HTTP server).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `directory`: registry / metadata / topology lookups over the
//!   directory console's REST API
//! - `exporter`: remote metrics exporter calls over HTTP
//! - `http`: the axum server exposing the aggregation API

pub mod directory;
pub mod exporter;
pub mod http;
