//! Registry Port - Live Registration Lookup Interface
//!
//! The mesh registry tracks which provider and consumer instances are
//! currently alive and under which identity they registered. The
//! resolver only ever reads; registration lifecycle is not our concern.

use async_trait::async_trait;

use crate::domain::registration::RegistrationEntry;

/// Trait for registry/directory backends.
///
/// Provider rows can be looked up by instance address or by service
/// identifier; consumer rows only by address. Implementors return rows
/// in the registry's own order, which the resolver preserves.
#[async_trait]
pub trait Registry: Send + Sync + 'static {
  /// All provider registrations whose instance address equals `address`.
  async fn find_registrations_by_address(
    &self,
    address: &str,
  ) -> anyhow::Result<Vec<RegistrationEntry>>;

  /// All provider registrations whose service identifier equals `service`.
  async fn find_registrations_by_service(
    &self,
    service: &str,
  ) -> anyhow::Result<Vec<RegistrationEntry>>;

  /// All consumer registrations whose instance address equals `address`.
  async fn find_consumers_by_address(
    &self,
    address: &str,
  ) -> anyhow::Result<Vec<RegistrationEntry>>;

  /// Check if the registry connection is healthy.
  async fn is_healthy(&self) -> bool;
}
