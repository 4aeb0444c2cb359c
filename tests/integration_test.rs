//! Integration Tests - End-to-end Pipeline Testing
//!
//! Tests the interaction between usecases, ports, and mock adapters.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::collections::HashMap;
use std::sync::Arc;

use mockall::mock;
use mockall::predicate::*;

use mesh_metrics_gateway::config::{AppConfig, FailurePolicy};
use mesh_metrics_gateway::domain::endpoint::ServiceEndpoint;
use mesh_metrics_gateway::domain::error::GatewayError;
use mesh_metrics_gateway::domain::registration::{RegistrationEntry, ServiceIdentifier, Side};
use mesh_metrics_gateway::ports::metadata::{ParameterBag, METRICS_PORT, METRICS_PROTOCOL};
use mesh_metrics_gateway::ports::topology::{RelationGraph, RelationLink, RelationNode};
use mesh_metrics_gateway::usecases::aggregator::MetricsAggregator;
use mesh_metrics_gateway::usecases::fetcher::MetricsFetcher;
use mesh_metrics_gateway::usecases::resolver::EndpointResolver;

// ---- Mock Definitions ----

mock! {
    pub Reg {}

    #[async_trait::async_trait]
    impl mesh_metrics_gateway::ports::registry::Registry for Reg {
        async fn find_registrations_by_address(
            &self,
            address: &str,
        ) -> anyhow::Result<Vec<RegistrationEntry>>;

        async fn find_registrations_by_service(
            &self,
            service: &str,
        ) -> anyhow::Result<Vec<RegistrationEntry>>;

        async fn find_consumers_by_address(
            &self,
            address: &str,
        ) -> anyhow::Result<Vec<RegistrationEntry>>;

        async fn is_healthy(&self) -> bool;
    }
}

mock! {
    pub Meta {}

    #[async_trait::async_trait]
    impl mesh_metrics_gateway::ports::metadata::MetadataStore for Meta {
        async fn provider_metadata(
            &self,
            id: &ServiceIdentifier,
        ) -> anyhow::Result<ParameterBag>;

        async fn consumer_metadata(
            &self,
            id: &ServiceIdentifier,
        ) -> anyhow::Result<ParameterBag>;
    }
}

mock! {
    pub Transport {}

    #[async_trait::async_trait]
    impl mesh_metrics_gateway::ports::transport::MetricsTransport for Transport {
        async fn invoke(&self, target: &str, group: &str) -> anyhow::Result<String>;
    }
}

mock! {
    pub Topo {}

    #[async_trait::async_trait]
    impl mesh_metrics_gateway::ports::topology::TopologyService for Topo {
        async fn application_relation(&self) -> anyhow::Result<RelationGraph>;
    }
}

// ---- Fixtures ----

fn entry(address: &str, service: &str, side: Side) -> RegistrationEntry {
    RegistrationEntry {
        address: address.to_string(),
        service: service.to_string(),
        application: "orders".to_string(),
        side,
    }
}

fn metrics_bag(port: &str, protocol: &str) -> ParameterBag {
    HashMap::from([
        (METRICS_PORT.to_string(), port.to_string()),
        (METRICS_PROTOCOL.to_string(), protocol.to_string()),
    ])
}

fn test_config(policy: FailurePolicy) -> AppConfig {
    let mut config: AppConfig = toml::from_str(
        r#"
            [gateway]
            name = "test-gateway"
            [server]
            [directory]
            base_url = "http://127.0.0.1:7001"
            [fetch]
            [probe]
            target = "dubbo://127.0.0.1:20880?scope=remote&cache=true"
        "#,
    )
    .unwrap();
    config.fetch.failure_policy = policy;
    config
}

// ---- Resolver ----

#[tokio::test]
async fn test_resolver_asymmetric_lookup_for_service_name_token() {
    let mut registry = MockReg::new();
    let mut metadata = MockMeta::new();

    // Service-name token: providers looked up by service, consumers
    // still looked up by address (preserved upstream behavior).
    registry
        .expect_find_registrations_by_service()
        .with(eq("com.example.OrderService"))
        .times(1)
        .returning(|_| {
            Ok(vec![entry(
                "10.0.0.5:20880",
                "com.example.OrderService",
                Side::Provider,
            )])
        });
    registry
        .expect_find_consumers_by_address()
        .with(eq("com.example.OrderService"))
        .times(1)
        .returning(|_| Ok(vec![]));

    metadata
        .expect_provider_metadata()
        .withf(|id| id.interface == "com.example.OrderService" && id.side == Side::Provider)
        .returning(|_| Ok(metrics_bag("9090", "dubbo")));

    let resolver = EndpointResolver::new(Arc::new(registry), Arc::new(metadata));
    let endpoints = resolver.resolve("com.example.OrderService").await.unwrap();

    assert_eq!(endpoints.len(), 1);
    assert_eq!(
        endpoints[0],
        ServiceEndpoint {
            address: "10.0.0.5:20880".to_string(),
            port: "9090".to_string(),
            protocol: "dubbo".to_string(),
            service_name: "com.example.OrderService".to_string(),
        }
    );
}

#[tokio::test]
async fn test_resolver_output_length_and_order() {
    let mut registry = MockReg::new();
    let mut metadata = MockMeta::new();

    registry
        .expect_find_registrations_by_address()
        .with(eq("10.0.0.5"))
        .returning(|_| {
            Ok(vec![
                entry("10.0.0.5:20880", "svc.A", Side::Provider),
                entry("10.0.0.5:20881", "svc.B", Side::Provider),
            ])
        });
    registry
        .expect_find_consumers_by_address()
        .with(eq("10.0.0.5"))
        .returning(|_| Ok(vec![entry("10.0.0.5:0", "svc.C", Side::Consumer)]));

    metadata
        .expect_provider_metadata()
        .returning(|_| Ok(metrics_bag("9090", "dubbo")));
    metadata
        .expect_consumer_metadata()
        .withf(|id| id.side == Side::Consumer)
        .returning(|_| Ok(metrics_bag("9091", "http")));

    let resolver = EndpointResolver::new(Arc::new(registry), Arc::new(metadata));
    let endpoints = resolver.resolve("10.0.0.5").await.unwrap();

    // 2 providers + 1 consumer, providers first.
    assert_eq!(endpoints.len(), 3);
    assert_eq!(endpoints[0].service_name, "svc.A");
    assert_eq!(endpoints[1].service_name, "svc.B");
    assert_eq!(endpoints[2].service_name, "svc.C");
}

#[tokio::test]
async fn test_resolver_emits_endpoint_despite_missing_port() {
    let mut registry = MockReg::new();
    let mut metadata = MockMeta::new();

    registry
        .expect_find_registrations_by_address()
        .returning(|_| Ok(vec![entry("10.0.0.5:20880", "svc.A", Side::Provider)]));
    registry
        .expect_find_consumers_by_address()
        .returning(|_| Ok(vec![]));

    metadata
        .expect_provider_metadata()
        .returning(|_| Ok(ParameterBag::new()));

    let resolver = EndpointResolver::new(Arc::new(registry), Arc::new(metadata));
    let endpoints = resolver.resolve("10.0.0.5").await.unwrap();

    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].port, "");
    assert_eq!(endpoints[0].protocol, "");
}

#[tokio::test]
async fn test_resolver_registry_failure_is_fatal() {
    let mut registry = MockReg::new();
    registry
        .expect_find_registrations_by_address()
        .returning(|_| Err(anyhow::anyhow!("registry unreachable")));
    registry
        .expect_find_consumers_by_address()
        .returning(|_| Ok(vec![]));

    let resolver = EndpointResolver::new(Arc::new(registry), Arc::new(MockMeta::new()));
    let err = resolver.resolve("10.0.0.5").await.unwrap_err();
    assert!(matches!(err, GatewayError::Resolution(_)));
}

// ---- Fetcher ----

#[tokio::test]
async fn test_fetcher_overwrites_decoy_address() {
    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .withf(|target, group| {
            target == "dubbo://10.0.0.5:9090?scope=remote&cache=true" && group == "provider"
        })
        .returning(|_, _| Ok(r#"[{"metric":"qps","ip":"99.99.99.99"}]"#.to_string()));

    let fetcher = MetricsFetcher::new(Arc::new(transport));
    let endpoint = ServiceEndpoint {
        address: "10.0.0.5:20880".to_string(),
        port: "9090".to_string(),
        protocol: "dubbo".to_string(),
        service_name: "svc".to_string(),
    };

    let records = fetcher.fetch(&endpoint, "provider").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip, "10.0.0.5:20880");
    assert!(!serde_json::to_string(&records).unwrap().contains("99.99.99.99"));
}

// ---- Aggregator ----

/// Two endpoints on one address, both healthy.
fn two_endpoint_registry() -> MockReg {
    let mut registry = MockReg::new();
    registry
        .expect_find_registrations_by_address()
        .returning(|_| {
            Ok(vec![
                entry("10.0.0.1:20880", "svc.one", Side::Provider),
                entry("10.0.0.2:20880", "svc.two", Side::Provider),
            ])
        });
    registry
        .expect_find_consumers_by_address()
        .returning(|_| Ok(vec![]));
    registry
}

fn per_service_metadata() -> MockMeta {
    let mut metadata = MockMeta::new();
    metadata.expect_provider_metadata().returning(|id| {
        let port = if id.interface == "svc.one" { "9091" } else { "9092" };
        Ok(metrics_bag(port, "http"))
    });
    metadata
}

#[tokio::test]
async fn test_aggregate_merges_in_discovery_order() {
    let mut transport = MockTransport::new();
    transport.expect_invoke().returning(|target, _| {
        if target.contains("10.0.0.1:9091") {
            Ok(r#"[{"metric":"a"},{"metric":"b"},{"metric":"c"}]"#.to_string())
        } else {
            Ok(r#"[{"metric":"d"}]"#.to_string())
        }
    });

    let aggregator = MetricsAggregator::new(
        Arc::new(two_endpoint_registry()),
        Arc::new(per_service_metadata()),
        Arc::new(transport),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );

    let outcome = aggregator.aggregate("10.0.0.1", "provider").await.unwrap();

    // 3 records from endpoint one, then 1 from endpoint two.
    assert_eq!(outcome.records.len(), 4);
    assert!(outcome.failures.is_empty());
    assert!(outcome.records[..3].iter().all(|r| r.ip == "10.0.0.1:20880"));
    assert_eq!(outcome.records[3].ip, "10.0.0.2:20880");
    assert_eq!(outcome.records[3].payload["metric"], "d");
}

#[tokio::test]
async fn test_aggregate_partial_failure_keeps_sibling_records() {
    let mut transport = MockTransport::new();
    transport.expect_invoke().returning(|target, _| {
        if target.contains("10.0.0.1:9091") {
            Ok(r#"[{"metric":"a"},{"metric":"b"},{"metric":"c"}]"#.to_string())
        } else {
            Err(anyhow::anyhow!("connection refused"))
        }
    });

    let aggregator = MetricsAggregator::new(
        Arc::new(two_endpoint_registry()),
        Arc::new(per_service_metadata()),
        Arc::new(transport),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );

    let outcome = aggregator.aggregate("10.0.0.1", "provider").await.unwrap();

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].address, "10.0.0.2:20880");
    assert_eq!(outcome.failures[0].stage, "transport");
}

#[tokio::test]
async fn test_aggregate_fail_policy_propagates_endpoint_error() {
    let mut transport = MockTransport::new();
    transport.expect_invoke().returning(|target, _| {
        if target.contains("10.0.0.1:9091") {
            Ok("[]".to_string())
        } else {
            Ok("not json".to_string())
        }
    });

    let aggregator = MetricsAggregator::new(
        Arc::new(two_endpoint_registry()),
        Arc::new(per_service_metadata()),
        Arc::new(transport),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Fail),
    );

    let err = aggregator.aggregate("10.0.0.1", "provider").await.unwrap_err();
    assert!(matches!(err, GatewayError::Parse(_)));
}

#[tokio::test]
async fn test_aggregate_idempotent_given_fixed_backends() {
    let mut transport = MockTransport::new();
    transport.expect_invoke().returning(|target, _| {
        if target.contains("10.0.0.1:9091") {
            Ok(r#"[{"metric":"a","value":1}]"#.to_string())
        } else {
            Ok(r#"[{"metric":"b","value":2}]"#.to_string())
        }
    });

    let aggregator = MetricsAggregator::new(
        Arc::new(two_endpoint_registry()),
        Arc::new(per_service_metadata()),
        Arc::new(transport),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );

    let first = aggregator.aggregate("10.0.0.1", "provider").await.unwrap();
    let second = aggregator.aggregate("10.0.0.1", "provider").await.unwrap();
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn test_empty_token_rejected_before_any_backend_call() {
    let aggregator = MetricsAggregator::new(
        Arc::new(MockReg::new()),
        Arc::new(MockMeta::new()),
        Arc::new(MockTransport::new()),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );

    let err = aggregator.aggregate("", "provider").await.unwrap_err();
    assert!(matches!(err, GatewayError::Classification(_)));
}

// ---- Delegated operations ----

#[tokio::test]
async fn test_relation_graph_is_pure_delegation() {
    let mut topology = MockTopo::new();
    topology.expect_application_relation().times(1).returning(|| {
        Ok(RelationGraph {
            nodes: vec![
                RelationNode { name: "orders".to_string(), index: 0 },
                RelationNode { name: "billing".to_string(), index: 1 },
            ],
            links: vec![RelationLink { source: 1, target: 0 }],
        })
    });

    let aggregator = MetricsAggregator::new(
        Arc::new(MockReg::new()),
        Arc::new(MockMeta::new()),
        Arc::new(MockTransport::new()),
        Arc::new(topology),
        &test_config(FailurePolicy::Degrade),
    );

    let graph = aggregator.application_relation().await.unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.links[0].source, 1);
}

#[tokio::test]
async fn test_readiness_tracks_registry_health() {
    let mut healthy = MockReg::new();
    healthy.expect_is_healthy().times(1).returning(|| true);

    let aggregator = MetricsAggregator::new(
        Arc::new(healthy),
        Arc::new(MockMeta::new()),
        Arc::new(MockTransport::new()),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );
    assert!(aggregator.is_ready().await);

    let mut unhealthy = MockReg::new();
    unhealthy.expect_is_healthy().times(1).returning(|| false);

    let aggregator = MetricsAggregator::new(
        Arc::new(unhealthy),
        Arc::new(MockMeta::new()),
        Arc::new(MockTransport::new()),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );
    assert!(!aggregator.is_ready().await);
}

#[tokio::test]
async fn test_probe_hits_configured_target_verbatim() {
    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .withf(|target, group| {
            target == "dubbo://127.0.0.1:20880?scope=remote&cache=true" && group == "provider"
        })
        .times(1)
        .returning(|_, _| Ok("raw exporter text".to_string()));

    let aggregator = MetricsAggregator::new(
        Arc::new(MockReg::new()),
        Arc::new(MockMeta::new()),
        Arc::new(transport),
        Arc::new(MockTopo::new()),
        &test_config(FailurePolicy::Degrade),
    );

    let text = aggregator.probe("provider").await.unwrap();
    assert_eq!(text, "raw exporter text");
}
