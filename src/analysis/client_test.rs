use super::*;
use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::Value;
use std::sync::{Arc, Mutex};

// =========================================================================
// Stub endpoint
// =========================================================================

type Recorded = Arc<Mutex<Vec<Value>>>;

/// Serve `reply` with `status` on an ephemeral port, recording request bodies.
async fn spawn_stub(status: StatusCode, reply: String) -> (String, Recorded) {
    let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let app = Router::new().route(
        "/api/analyze/",
        post(move |Json(body): Json<Value>| {
            let recorder = Arc::clone(&recorder);
            let reply = reply.clone();
            async move {
                recorder.lock().unwrap().push(body);
                (status, reply)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/analyze/"), seen)
}

fn client(endpoint: &str) -> HttpAnalysisClient {
    HttpAnalysisClient::new(endpoint, Duration::from_secs(2)).unwrap()
}

// =========================================================================
// Success paths
// =========================================================================

#[tokio::test]
async fn analyze_posts_query_and_decodes_result() {
    let reply = serde_json::json!({
        "summary": "Real Estate Analysis: Wakad",
        "chart": [{ "year": 2024, "price": 7500, "demand": 1050 }],
        "table": [{ "year": 2024, "area": "Wakad", "price": 7500, "demand": 1050, "size": 1200, "type": "2BHK" }],
        "areas": ["wakad"],
        "isComparison": false
    });
    let (endpoint, seen) = spawn_stub(StatusCode::OK, reply.to_string()).await;

    let result = client(&endpoint).analyze("Give me analysis of Wakad").await.unwrap();
    assert_eq!(result.summary, "Real Estate Analysis: Wakad");
    assert_eq!(result.chart.unwrap().len(), 1);
    assert_eq!(result.table.len(), 1);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], serde_json::json!({ "query": "Give me analysis of Wakad" }));
}

#[tokio::test]
async fn analyze_applies_defaults_for_sparse_payload() {
    let (endpoint, _) = spawn_stub(StatusCode::OK, "{}".into()).await;
    let result = client(&endpoint).analyze("Aundh").await.unwrap();
    assert_eq!(result.summary, types::DEFAULT_SUMMARY);
    assert_eq!(result.chart_type, types::DEFAULT_CHART_TYPE);
    assert!(result.table.is_empty());
}

#[tokio::test]
async fn analyze_accepts_fallback_payload_on_server_error_status() {
    let reply = serde_json::json!({
        "summary": "Server error while generating AI response.",
        "chartData": [],
        "tableData": [],
        "isComparison": false,
        "chartType": "price",
        "error_detail": "model unavailable"
    });
    let (endpoint, _) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, reply.to_string()).await;

    let result = client(&endpoint).analyze("Akurdi").await.unwrap();
    assert_eq!(result.summary, "Server error while generating AI response.");
    assert_eq!(result.error_detail.as_deref(), Some("model unavailable"));
}

// =========================================================================
// Failure paths
// =========================================================================

#[tokio::test]
async fn analyze_undecodable_body_with_error_status_is_status_failure() {
    let (endpoint, _) = spawn_stub(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>".into()).await;
    let err = client(&endpoint).analyze("Wakad").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Status { status: 502, .. }));
}

#[tokio::test]
async fn analyze_undecodable_body_with_ok_status_is_decode_failure() {
    let (endpoint, _) = spawn_stub(StatusCode::OK, "not json".into()).await;
    let err = client(&endpoint).analyze("Wakad").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Decode(_)));
}

#[tokio::test]
async fn analyze_unreachable_endpoint_is_request_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api/analyze/"))
        .analyze("Wakad")
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Request(_)));
    assert!(err.to_string().starts_with("request failed: "));
}

#[test]
fn endpoint_accessor_returns_configured_url() {
    let c = client("http://localhost:8000/api/analyze/");
    assert_eq!(c.endpoint(), "http://localhost:8000/api/analyze/");
}
