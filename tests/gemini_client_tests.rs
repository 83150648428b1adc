//! GeminiClient against an in-process stub of the generateContent endpoint.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;

use geminichat::{AnswerClient, DomainError, GeminiClient, GeminiConfig, KeyPlacement};

const GENERATE_PATH: &str = "/v1/models/gemini-pro/generate";

#[derive(Debug, Clone)]
struct Captured {
    query: HashMap<String, String>,
    api_key_header: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<Captured>>>,
}

async fn generate(
    State(stub): State<Stub>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let captured = Captured {
        query,
        api_key_header: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    };
    stub.seen.lock().unwrap().push(captured);
    (stub.status, stub.body.to_string())
}

/// Start a stub server and return its endpoint URL plus the captured requests.
async fn spawn_stub(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route(GENERATE_PATH, post(generate))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    (format!("http://{addr}{GENERATE_PATH}"), seen)
}

fn client(endpoint: &str, placement: KeyPlacement) -> GeminiClient {
    GeminiClient::new(
        GeminiConfig::new("test-key")
            .with_endpoint(endpoint)
            .with_key_placement(placement),
    )
}

#[tokio::test]
async fn test_posts_single_part_body_with_key_in_query() {
    let (endpoint, seen) = spawn_stub(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"**Hi** there"}]}}]}"#,
    )
    .await;

    let answer = client(&endpoint, KeyPlacement::Query)
        .ask("hello?")
        .await
        .expect("request should succeed");
    assert_eq!(answer, "**Hi** there");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].query.get("key").map(String::as_str), Some("test-key"));
    assert!(seen[0].api_key_header.is_none());
    assert_eq!(
        seen[0].body,
        serde_json::json!({"contents": [{"parts": [{"text": "hello?"}]}]})
    );
}

#[tokio::test]
async fn test_header_placement_keeps_key_out_of_url() {
    let (endpoint, seen) = spawn_stub(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#,
    )
    .await;

    client(&endpoint, KeyPlacement::Header)
        .ask("hello?")
        .await
        .expect("request should succeed");

    let seen = seen.lock().unwrap();
    assert!(!seen[0].query.contains_key("key"));
    assert_eq!(seen[0].api_key_header.as_deref(), Some("test-key"));
}

#[tokio::test]
async fn test_error_status_is_transport_error() {
    let (endpoint, _) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;

    let err = client(&endpoint, KeyPlacement::Query)
        .ask("hello?")
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_empty_candidates_fall_back() {
    let (endpoint, _) = spawn_stub(StatusCode::OK, r#"{"candidates":[]}"#).await;

    let answer = client(&endpoint, KeyPlacement::Query)
        .ask("hello?")
        .await
        .expect("absence of an answer is not an error");

    assert_eq!(answer, "No answer generated.");
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let (endpoint, _) = spawn_stub(StatusCode::OK, "<html>not json</html>").await;

    let err = client(&endpoint, KeyPlacement::Query)
        .ask("hello?")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = format!("http://{addr}{GENERATE_PATH}");
    let err = client(&endpoint, KeyPlacement::Query)
        .ask("hello?")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Network(_)));
    assert!(err.is_transport());
    assert!(
        !err.to_string().contains("test-key"),
        "API key leaked into error text: {err}"
    );
    assert!(!format!("Error: {err}").contains("key="));
}
