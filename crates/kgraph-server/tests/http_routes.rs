//! Route tests: drive the router in-process with a stub extractor.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use kgraph_core::{AppConfig, Error};
use kgraph_extract::{Node, Relationship, StubExtractor};
use kgraph_server::{build_router, AppState};
use tower::ServiceExt;

const BOUNDARY: &str = "kgraph-test-boundary";

fn alice_stub() -> StubExtractor {
    let alice = Node::new("Alice", "Person");
    let bob = Node::new("Bob", "Person");
    let acme = Node::new("Acme", "Organization");
    StubExtractor::fixed(
        vec![alice.clone(), bob.clone(), acme.clone()],
        vec![
            Relationship::new(alice.clone(), acme, "works_at"),
            Relationship::new(bob, alice, "manages"),
        ],
    )
}

fn setup(stub: StubExtractor) -> (tempfile::TempDir, Arc<AppState>, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::with_data_dir(dir.path()).unwrap();
    let state = Arc::new(AppState::new(config, Arc::new(stub), "stub"));
    let router = build_router(state.clone());
    (dir, state, router)
}

/// Multipart body from (name, filename, content) parts.
fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Body {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    Body::from(body)
}

fn form_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart(parts))
        .unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_serves_form() {
    let (_dir, _state, router) = setup(alice_stub());
    let response = router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_string(response).await;
    assert!(page.contains("Knowledge Graph From Text"));
    assert!(page.contains("Generate Knowledge Graph"));
    assert!(page.contains("accept=\".pdf,.docx,.txt\""));
}

#[tokio::test]
async fn test_graph_missing_before_generation() {
    let (_dir, _state, router) = setup(alice_stub());
    let response = router.oneshot(get("/graph")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_text_form_generates_and_embeds_graph() {
    let (dir, state, router) = setup(alice_stub());

    let response = router
        .clone()
        .oneshot(form_request(&[
            ("mode", None, "text"),
            ("text", None, "Alice works at Acme. Bob manages Alice."),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_string(response).await;
    assert!(page.contains("Knowledge graph generated successfully!"));
    assert!(page.contains("<iframe src=\"/graph?v="));
    assert!(page.contains("height=\"1000\""));
    assert!(dir.path().join("knowledge_graph.html").exists());

    let last = state.last_generation.read().clone().unwrap();
    assert_eq!(last.report.edges_added, 2);

    let response = router.oneshot(get("/graph")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let graph = body_string(response).await;
    assert!(graph.contains("\"label\":\"works_at\""));
    assert!(graph.contains("\"label\":\"manages\""));
}

#[tokio::test]
async fn test_upload_form_generates() {
    let (dir, _state, router) = setup(alice_stub());
    let response = router
        .oneshot(form_request(&[
            ("mode", None, "upload"),
            ("file", Some("story.txt"), "Alice works at Acme."),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(dir.path().join("knowledge_graph.html").exists());
}

#[tokio::test]
async fn test_form_without_input_is_rejected() {
    let (dir, state, router) = setup(alice_stub());

    let response = router
        .clone()
        .oneshot(form_request(&[("mode", None, "upload"), ("file", Some(""), "")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(form_request(&[("mode", None, "text"), ("text", None, "   ")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("banner warning"));

    assert!(!dir.path().join("knowledge_graph.html").exists());
    assert!(state.last_generation.read().is_none());
}

#[tokio::test]
async fn test_unsupported_upload_shows_reason() {
    let (_dir, _state, router) = setup(alice_stub());
    let response = router
        .oneshot(form_request(&[
            ("mode", None, "upload"),
            ("file", Some("slides.pptx"), "binary"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("banner error"));
}

#[tokio::test]
async fn test_extraction_failure_shows_generic_banner() {
    let stub = StubExtractor::default();
    stub.push_error(Error::Http("connection refused".into()));
    let (dir, _state, router) = setup(stub);

    let response = router
        .oneshot(form_request(&[("mode", None, "text"), ("text", None, "Alice.")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let page = body_string(response).await;
    assert!(page.contains("Failed to generate the knowledge graph."));
    assert!(!page.contains("connection refused"));
    assert!(!page.contains("<iframe"));
    assert!(!dir.path().join("knowledge_graph.html").exists());
}

#[tokio::test]
async fn test_api_graph_returns_summary() {
    let (_dir, _state, router) = setup(alice_stub());
    let response = router
        .oneshot(json_request(
            "/api/graph",
            serde_json::json!({ "text": "Alice works at Acme. Bob manages Alice." }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["artifact"]["nodeCount"], 3);
    assert_eq!(json["artifact"]["edgeCount"], 2);
    assert!(json["artifact"]["fingerprint"].is_string());
    assert_eq!(json["report"]["relationshipsDropped"], 0);
    assert!(json["report"]["skipped"].is_array());
}

#[tokio::test]
async fn test_api_graph_reports_dangling_edges() {
    let alice = Node::new("Alice", "Person");
    let ghost = Node::new("Ghost", "Person");
    let acme = Node::new("Acme", "Organization");
    let stub = StubExtractor::fixed(
        vec![alice.clone(), acme.clone()],
        vec![
            Relationship::new(alice.clone(), acme, "works_at"),
            Relationship::new(ghost, alice, "haunts"),
        ],
    );
    let (_dir, _state, router) = setup(stub);

    let response = router
        .oneshot(json_request("/api/graph", serde_json::json!({ "text": "..." })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["artifact"]["edgeCount"], 1);
    assert_eq!(json["report"]["relationshipsDropped"], 1);
}

#[tokio::test]
async fn test_api_graph_errors() {
    let stub = StubExtractor::default();
    stub.push_error(Error::Timeout(120));
    let (_dir, _state, router) = setup(stub);

    let response = router
        .clone()
        .oneshot(json_request("/api/graph", serde_json::json!({ "text": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(json_request("/api/graph", serde_json::json!({ "text": "Alice." })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    // Queue is drained and no fixed result is set.
    let response = router
        .oneshot(json_request("/api/graph", serde_json::json!({ "text": "Alice." })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_status_reports_last_generation() {
    let (_dir, _state, router) = setup(alice_stub());

    let response = router.clone().oneshot(get("/api/status")).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["provider"], "stub");
    assert_eq!(json["model"], "stub");
    assert_eq!(json["hasGraph"], false);
    assert!(json["lastGeneration"].is_null());

    router
        .clone()
        .oneshot(json_request("/api/graph", serde_json::json!({ "text": "Alice." })))
        .await
        .unwrap();

    let response = router.oneshot(get("/api/status")).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["hasGraph"], true);
    assert_eq!(json["lastGeneration"]["report"]["edgesAdded"], 2);
    assert!(json["outputFile"]
        .as_str()
        .unwrap()
        .ends_with("knowledge_graph.html"));
}
