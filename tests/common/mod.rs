//! Stand-in code server for integration tests.
//!
//! Serves `/codes.json`, `/api/bind` and `/api/delete-binding` from memory with
//! the same rules as the real server: binding removes the code from the list,
//! deleting a binding puts it back.

#![allow(dead_code)]
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use redeem_binder::utils::normalize_code;

#[derive(Debug, Default)]
pub struct Store {
    pub codes: Vec<String>,
    pub bindings: BTreeMap<String, String>,
    /// Answer writes with 500 `save_failed` without storing anything
    pub fail_writes: bool,
    /// Serve this body verbatim instead of the JSON document
    pub raw_document: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<Mutex<Store>>,
    fetches: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct ServerState {
    store: Arc<Mutex<Store>>,
    fetches: Arc<AtomicUsize>,
}

/// Start a server on an ephemeral port with the given codes and bindings.
pub async fn spawn_server(codes: &[&str], bindings: &[(&str, &str)]) -> TestServer {
    let store = Arc::new(Mutex::new(Store {
        codes: codes.iter().map(ToString::to_string).collect(),
        bindings: bindings
            .iter()
            .map(|(c, g)| ((*c).to_string(), (*g).to_string()))
            .collect(),
        ..Store::default()
    }));
    let fetches = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/codes.json", get(codes_document))
        .route("/api/bind", post(bind))
        .route("/api/delete-binding", post(delete_binding))
        .with_state(ServerState {
            store: Arc::clone(&store),
            fetches: Arc::clone(&fetches),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer {
        addr,
        store,
        fetches,
    }
}

/// A base URL nothing listens on.
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind to port");
    let port = listener.local_addr().expect("Failed to get local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn codes_document(State(state): State<ServerState>) -> Response {
    state.fetches.fetch_add(1, Ordering::SeqCst);
    let store = state.store.lock().await;
    if let Some(raw) = &store.raw_document {
        return ([(header::CONTENT_TYPE, "application/json")], raw.clone()).into_response();
    }
    Json(json!({ "codes": store.codes, "bindings": store.bindings })).into_response()
}

fn body_str(body: &Value, field: &str) -> String {
    body.get(field)
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

async fn bind(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    let code = normalize_code(&body_str(&body, "code"));
    let game = body_str(&body, "game").trim().to_string();
    if code.is_empty() || game.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "missing_code_or_game");
    }

    let mut store = state.store.lock().await;
    if store.fail_writes {
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "save_failed");
    }
    if !store.codes.iter().any(|c| normalize_code(c) == code) {
        return reject(StatusCode::BAD_REQUEST, "invalid_code");
    }
    if let Some(existing) = store.bindings.get(&code) {
        return Json(json!({ "ok": true, "code": code, "game": existing, "locked": true }))
            .into_response();
    }

    store.bindings.insert(code.clone(), game.clone());
    store.codes.retain(|c| normalize_code(c) != code);
    Json(json!({ "ok": true, "code": code, "game": game, "locked": true })).into_response()
}

async fn delete_binding(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    let code = normalize_code(&body_str(&body, "code"));
    if code.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "missing_code");
    }

    let mut store = state.store.lock().await;
    if store.fail_writes {
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "save_failed");
    }
    if store.bindings.remove(&code).is_none() {
        return reject(StatusCode::NOT_FOUND, "binding_not_found");
    }
    store.codes.push(code.clone());
    Json(json!({ "ok": true, "code": code, "message": "Binding deleted successfully" }))
        .into_response()
}

fn reject(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "ok": false, "error": error }))).into_response()
}

/// Prompter that answers confirmations with a fixed reply and records alerts.
#[derive(Debug, Default)]
pub struct RecordingPrompter {
    pub answer: bool,
    pub alerts: std::sync::Mutex<Vec<String>>,
}

impl RecordingPrompter {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            alerts: std::sync::Mutex::default(),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl redeem_binder::prompt::Prompter for RecordingPrompter {
    async fn confirm(&self, _message: &str) -> bool {
        self.answer
    }

    async fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}
