#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    routing::post,
};
use docker_push_relay::config::{RelayConfig, WatchList};
use docker_push_relay::{AppState, build_router};
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use tracing::subscriber::DefaultGuard;

pub const TEST_TOKEN: &str = "test-token";

/// A request received by the stub notification service.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub token: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
}

/// Gotify stand-in listening on an ephemeral local port.
pub struct StubGotify {
    pub url: String,
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
}

impl StubGotify {
    /// Starts a stub answering every `POST /message` with `status`.
    pub async fn spawn(status: StatusCode) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            received: received.clone(),
        };

        let app = Router::new()
            .route("/message", post(receive_message))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}", addr),
            received,
        }
    }

    pub fn received(&self) -> Vec<ReceivedMessage> {
        self.received.lock().unwrap().clone()
    }
}

async fn receive_message(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    state.received.lock().unwrap().push(ReceivedMessage {
        token: params.get("token").cloned(),
        body,
    });
    let text = if state.status.is_success() {
        "{}"
    } else {
        "stub refused the message"
    };
    (state.status, text)
}

pub fn test_router(gotify_url: &str, watched: &str) -> Router {
    let config = RelayConfig::new(gotify_url, TEST_TOKEN, WatchList::parse(watched));
    let state = AppState::new(config).expect("Failed to build app state");
    build_router(Arc::new(state))
}

/// Sends a request through the router, returning status and body text.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn webhook_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/docker-webhook")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn push_payload(name: &str, repo_name: &str, tag: &str, date: &str) -> String {
    serde_json::json!({
        "action": "push",
        "repository": { "name": name, "repo_name": repo_name },
        "target": { "tag": tag, "date": date }
    })
    .to_string()
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Installs a subscriber writing into this capture for the current
    /// thread. Logs are recorded until the guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
