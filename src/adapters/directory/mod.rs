//! Directory Console Adapter
//!
//! One client for the three backend ports the directory console
//! serves: registrations, metadata, and the relation graph.

pub mod client;

pub use client::{DirectoryClient, DirectoryClientConfig};
