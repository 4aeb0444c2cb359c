//! Directory Console Client - Registry, Metadata and Topology Lookups
//!
//! The directory console exposes the mesh's registration table, the
//! per-service metadata keyspace, and the application-relation graph
//! over one REST API, so a single reqwest-backed client implements all
//! three ports. Responses are JSON throughout.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::registration::{RegistrationEntry, ServiceIdentifier};
use crate::ports::metadata::{MetadataStore, ParameterBag};
use crate::ports::registry::Registry;
use crate::ports::topology::{RelationGraph, TopologyService};

/// Configuration for the directory console client.
#[derive(Debug, Clone)]
pub struct DirectoryClientConfig {
  /// Base URL for the console API.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

/// REST client for the directory console.
pub struct DirectoryClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: DirectoryClientConfig,
}

impl DirectoryClient {
  /// Create a new directory client.
  pub fn new(config: DirectoryClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
    let url = format!("{}{}", self.config.base_url, path);
    debug!(%url, "Directory lookup");

    let response = self
      .http
      .get(&url)
      .query(query)
      .send()
      .await
      .with_context(|| format!("directory request failed: {path}"))?;

    let status = response.status();
    anyhow::ensure!(status.is_success(), "directory error {status} for {path}");

    response
      .json::<T>()
      .await
      .with_context(|| format!("directory returned invalid JSON for {path}"))
  }

  fn identifier_query<'a>(id: &'a ServiceIdentifier, side: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
      ("interface", id.interface.as_str()),
      ("version", id.version.as_str()),
      ("group", id.group.as_str()),
      ("side", side),
      ("application", id.application.as_str()),
    ]
  }
}

#[async_trait]
impl Registry for DirectoryClient {
  async fn find_registrations_by_address(
    &self,
    address: &str,
  ) -> Result<Vec<RegistrationEntry>> {
    self
      .get_json("/api/registrations/providers", &[("address", address)])
      .await
  }

  async fn find_registrations_by_service(
    &self,
    service: &str,
  ) -> Result<Vec<RegistrationEntry>> {
    self
      .get_json("/api/registrations/providers", &[("service", service)])
      .await
  }

  async fn find_consumers_by_address(&self, address: &str) -> Result<Vec<RegistrationEntry>> {
    self
      .get_json("/api/registrations/consumers", &[("address", address)])
      .await
  }

  async fn is_healthy(&self) -> bool {
    let url = format!("{}/api/health", self.config.base_url);
    self
      .http
      .get(&url)
      .send()
      .await
      .map(|r| r.status().is_success())
      .unwrap_or(false)
  }
}

#[async_trait]
impl MetadataStore for DirectoryClient {
  async fn provider_metadata(&self, id: &ServiceIdentifier) -> Result<ParameterBag> {
    self
      .get_json("/api/metadata/provider", &Self::identifier_query(id, "provider"))
      .await
  }

  async fn consumer_metadata(&self, id: &ServiceIdentifier) -> Result<ParameterBag> {
    self
      .get_json("/api/metadata/consumer", &Self::identifier_query(id, "consumer"))
      .await
  }
}

#[async_trait]
impl TopologyService for DirectoryClient {
  async fn application_relation(&self) -> Result<RelationGraph> {
    self.get_json("/api/topology/relation", &[]).await
  }
}
