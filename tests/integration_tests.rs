//! Integration tests for Research Notebook
//!
//! These tests drive the full axum router with mock providers and a
//! temporary data file.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use research_notebook::config::Config;
use research_notebook::llm::MockGenerator;
use research_notebook::server::{router, AppState};
use research_notebook::sources::mock::make_paper;
use research_notebook::sources::MockSource;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: axum::Router,
    generator: Arc<MockGenerator>,
    source: Arc<MockSource>,
    data_file: PathBuf,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("research_data.json");

    let mut config = Config::default();
    config.storage.data_file = data_file.clone();

    let generator = Arc::new(MockGenerator::new());
    let source = Arc::new(MockSource::new());
    let state = AppState::new(&config, generator.clone(), source.clone());

    TestApp {
        app: router(state),
        generator,
        source,
        data_file,
        _dir: dir,
    }
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let res = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_load_without_file_returns_default() {
    let t = test_app();
    let (status, body) = send(&t.app, Method::GET, "/api/load", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"files": [], "bookmarks": []}));
}

#[tokio::test]
async fn test_empty_save_creates_file_then_is_ignored() {
    let t = test_app();
    let empty = json!({"files": [], "bookmarks": []});

    let (status, body) = send(&t.app, Method::POST, "/save_all", Some(empty.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));
    let first = std::fs::read(&t.data_file).unwrap();
    let on_disk: Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(on_disk, empty);

    let (_, body) = send(&t.app, Method::POST, "/save_all", Some(empty)).await;
    assert_eq!(body, json!({"status": "ignored"}));
    assert_eq!(std::fs::read(&t.data_file).unwrap(), first);
}

#[tokio::test]
async fn test_save_then_load() {
    let t = test_app();
    let doc = json!({"files": [{"id": 1}], "bookmarks": []});

    let (_, body) = send(&t.app, Method::POST, "/save_all", Some(doc)).await;
    assert_eq!(body, json!({"status": "success"}));

    let (status, loaded) = send(&t.app, Method::GET, "/api/load", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["files"], json!([{"id": 1}]));
}

#[tokio::test]
async fn test_save_writes_body_verbatim() {
    let t = test_app();
    let doc = json!({"files": [{"id": 1}]});

    send(&t.app, Method::POST, "/save_all", Some(doc.clone())).await;
    let (_, loaded) = send(&t.app, Method::GET, "/api/load", None).await;
    assert_eq!(loaded, doc);
}

#[tokio::test]
async fn test_save_keeps_large_integers() {
    let t = test_app();
    let raw = r#"{"files": [{"n": 123456789012345678901234567890}], "bookmarks": []}"#;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/save_all")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw))
        .unwrap();
    let res = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let on_disk = std::fs::read_to_string(&t.data_file).unwrap();
    assert!(on_disk.contains("123456789012345678901234567890"));

    let (_, loaded) = send(&t.app, Method::GET, "/api/load", None).await;
    assert_eq!(loaded, serde_json::from_str::<Value>(raw).unwrap());
}

#[tokio::test]
async fn test_round_trip_preserves_document() {
    let t = test_app();
    let doc = json!({
        "files": [
            {"id": "f1", "name": "実験ノート", "content": "pH 7.2\n温度 25℃", "tags": ["a", "b"]},
            {"id": "f2", "nested": {"x": null, "y": 1.5, "z": false}}
        ],
        "bookmarks": [{"title": "Paper", "url": "https://arxiv.org/pdf/1"}],
        "activeFileId": "f1"
    });

    send(&t.app, Method::POST, "/save_all", Some(doc.clone())).await;
    let (_, loaded) = send(&t.app, Method::GET, "/api/load", None).await;
    assert_eq!(loaded, doc);
}

#[tokio::test]
async fn test_corrupt_file_fails_load() {
    let t = test_app();
    std::fs::write(&t.data_file, "{\"files\": [").unwrap();

    let (status, body) = send(&t.app, Method::GET, "/api/load", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_ask_embeds_bookmark_titles() {
    let t = test_app();
    t.generator.set_default_reply("- one\n- two\n- three");

    let (status, body) = send(
        &t.app,
        Method::POST,
        "/ask",
        Some(json!({
            "text": "Sample turned brown after annealing",
            "bookmarked_papers": [{"title": "A"}, {"title": "B", "url": "http://b"}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"analysis": "- one\n- two\n- three"}));
    let prompt = t.generator.last_prompt().unwrap();
    assert!(prompt.contains("A, B"));
    assert!(prompt.contains("Sample turned brown after annealing"));
}

#[tokio::test]
async fn test_ask_failure_is_reported_in_body() {
    let t = test_app();
    t.generator.fail_with("API key is not configured");

    let (status, body) = send(&t.app, Method::POST, "/ask", Some(json!({"text": "note"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("API key"));
    assert!(body.get("analysis").is_none());
}

#[tokio::test]
async fn test_ask_paper_returns_records() {
    let t = test_app();
    t.generator.set_default_reply("\"thin film\"");
    t.source.set_papers(vec![make_paper("1", "Thin Films"), make_paper("2", "Sputtering")]);

    let (status, body) = send(
        &t.app,
        Method::POST,
        "/ask_paper",
        Some(json!({"text": "薄膜の成膜条件"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("error").is_none());
    let papers = body["papers"].as_array().unwrap();
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0]["title"], "Thin Films");
    assert_eq!(papers[0]["url"], "http://example.com/pdf/1");
    assert_eq!(papers[0]["abstract"], "Abstract of Thin Films");
    assert_eq!(t.source.queries()[0].query, "thin film");
}

#[tokio::test]
async fn test_ask_paper_failure_keeps_papers_field() {
    let t = test_app();
    t.generator.set_default_reply("thin film");
    t.source.fail_with("arXiv unreachable");

    let (status, body) = send(&t.app, Method::POST, "/ask_paper", Some(json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(body["papers"], json!([]));
}

#[tokio::test]
async fn test_malformed_body_rejected_before_handlers() {
    let t = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let res = t.app.clone().oneshot(req).await.unwrap();
    assert!(res.status().is_client_error());
    assert!(t.generator.prompts().is_empty());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let t = test_app();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/save_all")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let res = t.app.clone().oneshot(req).await.unwrap();
    assert!(res.status().is_success());
    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_health() {
    let t = test_app();
    let (status, body) = send(&t.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], research_notebook::VERSION);
}
