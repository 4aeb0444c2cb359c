//! Topology Port - Application Relation Graph Interface
//!
//! The relation endpoint is pure delegation: the gateway forwards the
//! graph the topology backend maintains, with no orchestration of its
//! own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One application node in the relation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationNode {
  /// Application name.
  pub name: String,
  /// Stable node index referenced by links.
  pub index: u32,
}

/// One directed consumer-to-provider edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationLink {
  /// Index of the calling application.
  pub source: u32,
  /// Index of the called application.
  pub target: u32,
}

/// Application-relation topology of the mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationGraph {
  /// All known applications.
  pub nodes: Vec<RelationNode>,
  /// All observed call relations.
  pub links: Vec<RelationLink>,
}

/// Trait for topology backends.
#[async_trait]
pub trait TopologyService: Send + Sync + 'static {
  /// Current application-relation graph.
  async fn application_relation(&self) -> anyhow::Result<RelationGraph>;
}
