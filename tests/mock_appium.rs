//! Mock Appium server
//!
//! This module provides a loopback W3C WebDriver endpoint for testing the HTTP
//! driver without a real Appium server or device. Requests are served by an
//! axum router on a private tokio runtime.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;

pub const SESSION_ID: &str = "stub-session";
pub const SCREENSHOT: &[u8] = b"\x89PNG stub";
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecc";

/// One request received by the server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    platform: Arc<str>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    expired: Arc<AtomicBool>,
}

/// Mock Appium server
pub struct MockAppiumServer {
    url: String,
    state: StubState,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl MockAppiumServer {
    /// Start a new mock server on an ephemeral port
    pub fn start(platform: &str) -> std::io::Result<Self> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let url = format!("http://{}", listener.local_addr()?);

        let state = StubState {
            platform: Arc::from(platform),
            requests: Arc::new(Mutex::new(Vec::new())),
            expired: Arc::new(AtomicBool::new(false)),
        };
        let app = Router::new().fallback(dispatch).with_state(state.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (tx, rx) = oneshot::channel();

        thread::spawn(move || {
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(e) => {
                        tracing::error!("Mock Appium: Listener error: {}", e);
                        return;
                    }
                };
                // Dropping the serve future closes the listener
                tokio::select! {
                    result = axum::serve(listener, app) => {
                        if let Err(e) = result {
                            tracing::error!("Mock Appium: Serve error: {}", e);
                        }
                    }
                    _ = rx => {}
                }
            });
        });

        Ok(Self {
            url,
            state,
            shutdown: Mutex::new(Some(tx)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Answer every session-scoped command with `invalid session id` until
    /// the next session is created
    pub fn expire_sessions(&self) {
        self.state.expired.store(true, Ordering::SeqCst);
    }

    /// Stop accepting connections
    pub fn shutdown(&self) {
        if let Some(tx) = self.shutdown.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAppiumServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn dispatch(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();

    let (status, response) = route(&state, method.as_str(), &path, &body);
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path,
        body,
    });

    (status, Json(response))
}

/// Create a W3C response for a request
fn route(state: &StubState, method: &str, path: &str, body: &Value) -> (StatusCode, Value) {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let ok = |value: Value| (StatusCode::OK, json!({ "value": value }));
    let error = |status: StatusCode, code: &str, message: &str| {
        (status, json!({ "value": { "error": code, "message": message } }))
    };

    if let ["session", _, ..] = segments.as_slice() {
        if state.expired.load(Ordering::SeqCst) {
            return error(
                StatusCode::NOT_FOUND,
                "invalid session id",
                "A session is either terminated or not started",
            );
        }
    }

    match (method, segments.as_slice()) {
        ("GET", ["status"]) => ok(json!({ "ready": true })),
        ("POST", ["session"]) => {
            state.expired.store(false, Ordering::SeqCst);
            ok(json!({
                "sessionId": SESSION_ID,
                "capabilities": { "platformName": &*state.platform },
            }))
        }
        ("DELETE", ["session", _]) => ok(Value::Null),
        ("POST", ["session", _, "elements"]) => match body["value"].as_str() {
            Some("test-LOGIN") => ok(json!([{ ELEMENT_KEY: "login" }])),
            Some("test-Price") => ok(json!([{ ELEMENT_KEY: "price" }, { "ELEMENT": "legacy" }])),
            Some(value) if value.ends_with('[') => error(
                StatusCode::BAD_REQUEST,
                "invalid selector",
                "Unable to parse selector",
            ),
            _ => ok(json!([])),
        },
        ("GET", ["session", _, "element", "gone", _]) => error(
            StatusCode::NOT_FOUND,
            "stale element reference",
            "Element is no longer attached",
        ),
        ("GET", ["session", _, "element", _, "displayed"]) => ok(json!(true)),
        ("GET", ["session", _, "element", _, "enabled"]) => ok(json!(true)),
        ("GET", ["session", _, "element", "price", "text"]) => ok(json!("$7.99")),
        ("GET", ["session", _, "element", _, "text"]) => ok(json!("LOGIN")),
        ("GET", ["session", _, "element", _, "rect"]) => {
            ok(json!({ "x": 0.0, "y": 0.0, "width": 100.0, "height": 50.0 }))
        }
        ("POST", ["session", _, "element", _, "clear" | "click" | "value"]) => ok(Value::Null),
        ("POST", ["session", _, "execute", "sync"]) => ok(Value::Null),
        ("GET", ["session", _, "screenshot"]) => ok(json!(BASE64.encode(SCREENSHOT))),
        _ => error(
            StatusCode::NOT_FOUND,
            "unknown command",
            "The requested resource could not be found",
        ),
    }
}
