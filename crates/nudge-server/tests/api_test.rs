//! Integration tests for the Nudge HTTP API
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`,
//! so no socket is bound.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use nudge_server::{create_router, with_middleware, AppState, ServerConfig};
use serde_json::{json, Value};
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use tower::ServiceExt;

const CORPUS: &str = "\
message,sentiment
you are doing great,positive
you are doing great,positive
you are doing badly,negative
we are doing fine,neutral
";

fn test_state(corpus_path: &Path) -> AppState {
    let mut config = ServerConfig::default();
    config.model.corpus_path = corpus_path.to_path_buf();
    state_with(config)
}

fn state_with(config: ServerConfig) -> AppState {
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
    AppState::new(config, metrics_handle).unwrap()
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/messages/autocomplete")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

/// Corpus source that holds a training pass open until released
struct HeldCorpus {
    data: Cursor<Vec<u8>>,
    started: Option<mpsc::Sender<()>>,
    release: mpsc::Receiver<()>,
}

impl Read for HeldCorpus {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(started) = self.started.take() {
            let _ = started.send(());
            let _ = self.release.recv();
        }
        self.data.read(buf)
    }
}

async fn trained_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feelings.csv");
    std::fs::write(&path, CORPUS).unwrap();

    let state = test_state(&path);
    assert!(state.train().await.unwrap().is_some());
    (create_router(state), dir)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = trained_app().await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_autocomplete_exact_match() {
    let (app, _dir) = trained_app().await;
    let (status, body) = post_json(
        app,
        "/api/messages/autocomplete",
        json!({ "text": "You are doing", "slider_state": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "suggestion": "badly" }));
}

#[tokio::test]
async fn test_autocomplete_defaults_to_neutral() {
    let (app, _dir) = trained_app().await;
    let (status, body) =
        post_json(app, "/api/messages/autocomplete", json!({ "text": "are doing" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "suggestion": "fine" }));
}

#[tokio::test]
async fn test_autocomplete_short_text_is_null() {
    let (app, _dir) = trained_app().await;
    for slider_state in [0, 1, 2, 7] {
        let (status, body) = post_json(
            app.clone(),
            "/api/messages/autocomplete",
            json!({ "text": "doing", "slider_state": slider_state }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "suggestion": null }));
    }
}

#[tokio::test]
async fn test_autocomplete_rejects_malformed_body() {
    let (app, _dir) = trained_app().await;
    let (status, body) =
        post_json(app, "/api/messages/autocomplete", json!({ "slider_state": 0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_untrained_server_returns_null() {
    let state = test_state(Path::new("/no/such/feelings.csv"));
    assert!(state.train().await.unwrap().is_none());

    let app = create_router(state);
    let (status, body) = post_json(
        app,
        "/api/messages/autocomplete",
        json!({ "text": "you are doing", "slider_state": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "suggestion": null }));
}

#[tokio::test]
async fn test_model_stats() {
    let (app, _dir) = trained_app().await;
    let request = Request::builder()
        .uri("/api/model/stats")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let buckets = body["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0]["bucket"], "positive");
    assert_eq!(buckets[0]["bigrams"], 2);
    assert_eq!(buckets[0]["observations"], 4);
}

#[tokio::test]
async fn test_retrain_picks_up_new_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feelings.csv");
    std::fs::write(&path, CORPUS).unwrap();

    let state = test_state(&path);
    state.train().await.unwrap();
    let app = create_router(state);

    std::fs::write(&path, "message,sentiment\nyou are doing wonderfully,positive\n").unwrap();
    let (status, body) = post_json(app.clone(), "/api/model/retrain", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trained"], true);
    assert_eq!(body["report"]["examples"], 2);

    let (_, body) = post_json(
        app,
        "/api/messages/autocomplete",
        json!({ "text": "you are doing", "slider_state": 0 }),
    )
    .await;
    assert_eq!(body, json!({ "suggestion": "wonderfully" }));
}

#[tokio::test]
async fn test_failed_retrain_keeps_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feelings.csv");
    std::fs::write(&path, CORPUS).unwrap();

    let state = test_state(&path);
    state.train().await.unwrap();
    let app = create_router(state);

    std::fs::write(&path, "text,label\nanything at all,positive\n").unwrap();
    let (status, body) = post_json(app.clone(), "/api/model/retrain", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trained"], false);
    assert_eq!(body["report"], Value::Null);

    let (_, body) = post_json(
        app,
        "/api/messages/autocomplete",
        json!({ "text": "you are doing", "slider_state": 0 }),
    )
    .await;
    assert_eq!(body, json!({ "suggestion": "great" }));
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _dir) = trained_app().await;
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let (app, _dir) = trained_app().await;

    let response = app.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let response = app.oneshot(preflight("http://evil.test")).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard_allows_any_origin() {
    let mut config = ServerConfig::default();
    config.cors_origins = vec!["*".to_string()];
    let app = create_router(state_with(config));

    let response = app.oneshot(preflight("http://evil.test")).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let mut config = ServerConfig::default();
    config.request_timeout_ms = 20;

    let routes = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        )
        .route("/fast", get(|| async { "done" }));
    let app = with_middleware(routes, &config);

    let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    let request = Request::builder().uri("/fast").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_retrain_conflicts_while_training() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feelings.csv");
    std::fs::write(&path, CORPUS).unwrap();

    let state = test_state(&path);
    let app = create_router(state.clone());

    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let source = HeldCorpus {
        data: Cursor::new(b"message,sentiment\nyou are doing wonderfully,positive\n".to_vec()),
        started: Some(started_tx),
        release: release_rx,
    };
    let model = state.model.clone();
    let holder = std::thread::spawn(move || model.train_from_reader(source));
    started_rx.recv().unwrap();

    let (status, body) = post_json(app.clone(), "/api/model/retrain", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "conflict_error");

    release_tx.send(()).unwrap();
    assert!(holder.join().unwrap().is_some());

    let (status, body) = post_json(app, "/api/model/retrain", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trained"], true);
}
