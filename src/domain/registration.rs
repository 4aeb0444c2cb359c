//! Registry Registrations and Service Identifiers
//!
//! Read-only views of what the mesh registry tracks: one row per live
//! provider or consumer instance. The resolver never mutates these.
//!
//! A registration's `service` string carries up to three coordinates in
//! the form `[group/]interface[:version]`; `ServiceIdentifier` is its
//! deterministic decomposition, used as the metadata-store lookup key.

use serde::{Deserialize, Serialize};

/// Which side of a call a registration represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  /// Exposes an interface for remote callers.
  Provider,
  /// Calls a provider's interface.
  Consumer,
}

impl std::fmt::Display for Side {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Provider => write!(f, "provider"),
      Self::Consumer => write!(f, "consumer"),
    }
  }
}

/// One live registration row as reported by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationEntry {
  /// Instance network address, typically `host:port`.
  pub address: String,
  /// Service identifier string, `[group/]interface[:version]`.
  pub service: String,
  /// Owning application name.
  pub application: String,
  /// Provider or consumer.
  pub side: Side,
}

/// Fully-qualified lookup key into the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdentifier {
  /// Bare interface name, coordinates stripped.
  pub interface: String,
  /// Service version, empty when unversioned.
  pub version: String,
  /// Service group, empty when ungrouped.
  pub group: String,
  /// Side the metadata was published for.
  pub side: Side,
  /// Owning application name.
  pub application: String,
}

impl ServiceIdentifier {
  /// Derive the identifier for a registration row.
  ///
  /// The side is passed explicitly rather than taken from the entry so
  /// the resolver controls which metadata variant gets queried.
  pub fn for_entry(entry: &RegistrationEntry, side: Side) -> Self {
    let (group, rest) = match entry.service.split_once('/') {
      Some((group, rest)) => (group, rest),
      None => ("", entry.service.as_str()),
    };
    let (interface, version) = match rest.rsplit_once(':') {
      Some((interface, version)) => (interface, version),
      None => (rest, ""),
    };
    Self {
      interface: interface.to_string(),
      version: version.to_string(),
      group: group.to_string(),
      side,
      application: entry.application.clone(),
    }
  }
}
