//! Admin-Console HTTP Adapter
//!
//! axum server exposing the aggregation pipeline to the console UI.

pub mod routes;
pub mod server;

pub use routes::router;
pub use server::serve;
