//! Tests for metrics emitted by the client and the tool dispatcher.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::time::Duration;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use korea_tourism_mcp::client::AreaCodeQuery;
use korea_tourism_mcp::server::McpHandler;
use korea_tourism_mcp::telemetry;
use korea_tourism_mcp::tools::ToolRegistry;
use korea_tourism_mcp::{ClientConfig, LazyClient, RetryConfig, TourismClient};

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Whether any metric with `name` carries the label `key=value`.
fn has_label(snapshot: &SnapshotVec, name: &str, key: &str, value: &str) -> bool {
    snapshot.iter().any(|(composite, _, _, _)| {
        composite.key().name() == name
            && composite
                .key()
                .labels()
                .any(|label| label.key() == key && label.value() == value)
    })
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn area_codes_body() -> serde_json::Value {
    json!({
        "response": {
            "header": {"resultCode": "0000", "resultMsg": "OK"},
            "body": {
                "items": {"item": [{"code": "1", "name": "Seoul"}]},
                "numOfRows": 100,
                "pageNo": 1,
                "totalCount": 1
            }
        }
    })
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("test-key")
        .base_url(server.uri())
        .rate_limit(100, Duration::from_secs(1))
        .retry(
            RetryConfig::new()
                .max_attempts(2)
                .initial_delay(Duration::from_millis(1)),
        )
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn upstream_request_records_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/areaCode1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_codes_body()))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let client = TourismClient::new(config(&server)).unwrap();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let query = AreaCodeQuery::default();
                client.area_codes(&query).await.unwrap();
                client.area_codes(&query).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
    assert!(has_label(&snapshot, telemetry::REQUESTS_TOTAL, "operation", "area_code"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn retries_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let client = TourismClient::new(config(&server)).unwrap();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(async { client.area_codes(&AreaCodeQuery::default()).await })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn tool_calls_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/areaCode1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_codes_body()))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let client = Arc::new(LazyClient::new(config(&server)));
    let handler = McpHandler::new(ToolRegistry::with_defaults(client));

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                for name in ["get_area_codes", "search_tourism_by_keyword"] {
                    handler
                        .handle_value(json!({
                            "jsonrpc": "2.0",
                            "id": 1,
                            "method": "tools/call",
                            "params": {"name": name, "arguments": {}}
                        }))
                        .await;
                }
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    // The keyword call fails validation (no keyword) but is still counted.
    assert_eq!(counter_total(&snapshot, telemetry::TOOL_CALLS_TOTAL), 2);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_codes_body()))
        .mount(&server)
        .await;
    let client = TourismClient::new(config(&server)).unwrap();
    client
        .area_codes(&AreaCodeQuery::default())
        .await
        .unwrap();
}
