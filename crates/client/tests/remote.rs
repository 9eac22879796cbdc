//! Remote dispatch against an in-process stub backend.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use fdq_client::{Backend, QueryError, RemoteBackend};
use fdq_core::config::{BackendMode, ClientConfig};
use fdq_core::session::QueryOutcome;
use fdq_types::QueryText;

/// Serve the router on an ephemeral port and return the base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}")
}

fn remote_backend(base_url: &str) -> RemoteBackend {
    let config = ClientConfig::new(BackendMode::Remote, base_url).expect("config");
    RemoteBackend::new(&config).expect("backend")
}

async fn answer_query(Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    Json(json!({
        "query": query,
        "generated_code": "Patient.count()",
        "result": [],
        "data": {
            "type": "count",
            "value": 3,
            "count": 3,
            "table": {
                "columns": ["id", "name"],
                "rows": [{ "id": "PAT001", "name": "John Smith" }],
                "total": 1
            }
        },
        "natural_language_response": "There are 3 patients on record.",
        "execution_time": 0.42
    }))
}

#[tokio::test]
async fn successful_dispatch_returns_envelope() {
    let base_url = spawn_backend(Router::new().route("/query", post(answer_query))).await;
    let backend = remote_backend(&base_url);
    let query = QueryText::new("How many patients do we have?").expect("query");

    let outcome = backend.dispatch(&query).await.expect("dispatch");
    match outcome {
        QueryOutcome::Api(envelope) => {
            assert_eq!(envelope.query, "How many patients do we have?");
            assert_eq!(envelope.data.count, Some(3));
            assert!(envelope.data.table.is_some());
        }
        other => panic!("expected api outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn server_detail_becomes_the_error_message() {
    async fn fail(Json(_): Json<Value>) -> (StatusCode, Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "db unreachable" })),
        )
    }

    let base_url = spawn_backend(Router::new().route("/query", post(fail))).await;
    let backend = remote_backend(&base_url);
    let query = QueryText::new("anything").expect("query");

    let err = backend.dispatch(&query).await.expect_err("should fail");
    match err {
        QueryError::Backend { detail } => assert_eq!(detail, "db unreachable"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn detail_free_failure_uses_generic_message() {
    async fn fail(Json(_): Json<Value>) -> (StatusCode, String) {
        (StatusCode::BAD_GATEWAY, "upstream exploded".to_string())
    }

    let base_url = spawn_backend(Router::new().route("/query", post(fail))).await;
    let backend = remote_backend(&base_url);
    let query = QueryText::new("anything").expect("query");

    let err = backend.dispatch(&query).await.expect_err("should fail");
    match err {
        QueryError::Backend { detail } => assert_eq!(detail, "Failed to fetch data"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn schema_mismatch_reports_the_json_path() {
    async fn mangled(Json(_): Json<Value>) -> Json<Value> {
        Json(json!({
            "query": "q",
            "generated_code": "",
            "result": [],
            "data": { "chart": { "labels": "nope", "datasets": [] } },
            "natural_language_response": "",
            "execution_time": 0.1
        }))
    }

    let base_url = spawn_backend(Router::new().route("/query", post(mangled))).await;
    let backend = remote_backend(&base_url);
    let query = QueryText::new("anything").expect("query");

    let err = backend.dispatch(&query).await.expect_err("should fail");
    match err {
        QueryError::Decode(decode) => {
            assert!(
                decode.path.contains("data.chart.labels"),
                "path was {}",
                decode.path
            );
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_surfaces_remediation_guidance() {
    // Grab an ephemeral port, then free it so the connection is refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);

    let backend = remote_backend(&base_url);
    let query = QueryText::new("anything").expect("query");

    let err = backend.dispatch(&query).await.expect_err("should fail");
    match &err {
        QueryError::Unreachable { url, .. } => assert_eq!(url, &base_url),
        other => panic!("expected unreachable error, got {other:?}"),
    }

    let banner = err.to_string();
    assert!(banner.contains(&base_url), "banner was: {banner}");
    assert!(banner.contains("CORS"), "banner was: {banner}");
}
