//! Supabase signal sink against a mock REST endpoint

use serde_json::json;
use signal_ui_bot::config::SignalSinkConfig;
use signal_ui_bot::services::signal::{RequestType, SupabaseSink, WorkItem, WorkSink};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sink_config(url: Option<String>) -> SignalSinkConfig {
    SignalSinkConfig {
        url,
        key: Some("anon-key".to_string()),
        table: "signal_requests".to_string(),
        timeout_seconds: 2,
    }
}

#[tokio::test]
async fn test_unconfigured_sink_is_absent() {
    assert!(SupabaseSink::from_config(&sink_config(None)).unwrap().is_none());
}

#[tokio::test]
async fn test_submit_inserts_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/signal_requests"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("prefer", "return=minimal"))
        .and(body_json(json!({"user_id": 42, "request_type": "latest_signal", "status": "pending"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let sink = SupabaseSink::from_config(&sink_config(Some(server.uri()))).unwrap().unwrap();
    sink.submit(&WorkItem::pending(42, RequestType::LatestSignal)).await.unwrap();
}

#[tokio::test]
async fn test_rejected_insert_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/signal_requests"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let sink = SupabaseSink::from_config(&sink_config(Some(server.uri()))).unwrap().unwrap();
    assert!(sink.submit(&WorkItem::pending(42, RequestType::Short)).await.is_err());
}

#[tokio::test]
async fn test_health_check_probes_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/signal_requests"))
        .and(query_param("select", "id"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let sink = SupabaseSink::from_config(&sink_config(Some(server.uri()))).unwrap().unwrap();
    sink.health_check().await.unwrap();
}
