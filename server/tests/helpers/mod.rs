//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router with a recording relay in place of Feishu, plus a mock Feishu open
//! platform that can be bound to a random port.
//!
//! ## Test Servers
//!
//! Use [`spawn_test_server()`] when a real socket is needed, e.g. to point
//! `FeishuClient` at [`MockFeishu`].
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{self, HeaderMap, Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use github_feishu_server::api::{create_router, AppState};
use github_feishu_server::cards::CardDocument;
use github_feishu_server::config::Config;
use github_feishu_server::relay::{MessageRelay, RelayError};
use github_feishu_server::webhooks::signing::sign_payload;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// Secret used by [`Config::default_for_test`].
pub const TEST_SECRET: &str = "test-secret";

// ============================================================================
// Recording relay
// ============================================================================

/// Relay that stores every card instead of sending it.
#[derive(Default)]
pub struct RecordingRelay {
    cards: Mutex<Vec<CardDocument>>,
    fail: bool,
}

impl RecordingRelay {
    /// A relay whose every send fails with an API error.
    pub fn failing() -> Self {
        Self {
            cards: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Cards handed to the relay so far.
    pub fn sent(&self) -> Vec<CardDocument> {
        self.cards.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageRelay for RecordingRelay {
    async fn send(&self, card: &CardDocument) -> Result<(), RelayError> {
        self.cards.lock().unwrap().push(card.clone());
        if self.fail {
            return Err(RelayError::Api {
                code: 230_002,
                msg: "bot is not in the chat".into(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub relay: Arc<RecordingRelay>,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a new test app with signature verification enabled.
    pub fn new() -> Self {
        Self::build(Config::default_for_test(), RecordingRelay::default())
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        Self::build(config, RecordingRelay::default())
    }

    /// Create a test app whose relay always fails.
    pub fn with_failing_relay() -> Self {
        Self::build(Config::default_for_test(), RecordingRelay::failing())
    }

    fn build(config: Config, relay: RecordingRelay) -> Self {
        let relay = Arc::new(relay);
        let router = create_router(AppState::new(config.clone(), relay.clone()));
        Self {
            router,
            relay,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST a payload to `/webhook`, signed with [`TEST_SECRET`].
    pub async fn post_event(&self, event: &str, payload: &Value) -> Response<Body> {
        let body = serde_json::to_vec(payload).unwrap();
        let signature = sign_payload(TEST_SECRET, &body);
        self.oneshot(webhook_request(event, body, Some(&signature)))
            .await
    }
}

/// Build a `POST /webhook` request the way GitHub sends it.
pub fn webhook_request(event: &str, body: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = TestApp::request(Method::POST, "/webhook")
        .header("Content-Type", "application/json")
        .header("X-GitHub-Event", event)
        .header("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    if let Some(signature) = signature {
        builder = builder.header("X-Hub-Signature-256", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}

/// Number of commit entries in a push card.
pub fn commit_blocks(card: &CardDocument) -> usize {
    card.div_contents()
        .iter()
        .filter(|c| c.starts_with("**["))
        .count()
}

// ============================================================================
// Payload fixtures
// ============================================================================

pub fn repository() -> Value {
    json!({ "name": "hello-world", "html_url": "https://github.com/octo/hello-world" })
}

pub fn push_payload(branch_ref: &str, commit_count: usize) -> Value {
    let commits: Vec<Value> = (0..commit_count)
        .map(|i| {
            json!({
                "id": format!("{i:07}deadbeefcafebabe"),
                "url": format!("https://github.com/octo/hello-world/commit/{i}"),
                "message": format!("Change #{i}"),
                "author": { "name": "Mona Lisa" }
            })
        })
        .collect();
    json!({
        "ref": branch_ref,
        "repository": repository(),
        "pusher": { "name": "mona" },
        "commits": commits,
    })
}

pub fn pull_request_payload(action: &str) -> Value {
    json!({
        "action": action,
        "pull_request": {
            "title": "Fix typo",
            "html_url": "https://github.com/octo/hello-world/pull/42",
            "user": { "login": "mona" },
            "head": { "ref": "typo" },
            "base": { "ref": "main" },
            "merged": false,
            "body": "Fixes the README."
        },
        "repository": repository(),
    })
}

pub fn issue_payload(action: &str, body: &str) -> Value {
    json!({
        "action": action,
        "issue": {
            "title": "Broken link",
            "html_url": "https://github.com/octo/hello-world/issues/7",
            "user": { "login": "hubot" },
            "body": body
        },
        "repository": repository(),
    })
}

// ============================================================================
// Test Server
// ============================================================================

/// A running test server bound to a random port.
pub struct TestServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL for HTTP requests (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn a real HTTP server on a random port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

// ============================================================================
// Mock Feishu open platform
// ============================================================================

/// Token the mock hands out.
pub const MOCK_TOKEN: &str = "t-g1044ghJRUIJJ5ELPLOLAH6CGCRGHGFG2BZEMRGL";

/// In-memory stand-in for the Feishu token and message endpoints.
#[derive(Default)]
pub struct MockFeishu {
    /// Times the token endpoint was called.
    pub token_calls: AtomicUsize,
    /// Message request bodies, in arrival order.
    pub messages: Mutex<Vec<Value>>,
    /// `code` returned by the token endpoint.
    pub token_code: i64,
    /// `code` returned by the message endpoint.
    pub message_code: i64,
    /// `expire` returned with the token; two hours when unset.
    pub token_expire: Option<u64>,
}

impl MockFeishu {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().unwrap().clone()
    }

    /// Bind the mock to a random port.
    pub async fn spawn(self: &Arc<Self>) -> TestServer {
        let router = Router::new()
            .route(
                "/open-apis/auth/v3/tenant_access_token/internal",
                post(mock_token),
            )
            .route("/open-apis/im/v1/messages", post(mock_message))
            .with_state(self.clone());
        spawn_test_server(router).await
    }
}

async fn mock_token(State(mock): State<Arc<MockFeishu>>, Json(req): Json<Value>) -> Json<Value> {
    mock.token_calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(req["app_id"], "cli_test");
    assert_eq!(req["app_secret"], "test-app-secret");

    if mock.token_code != 0 {
        return Json(json!({ "code": mock.token_code, "msg": "app secret invalid" }));
    }
    Json(json!({
        "code": 0,
        "msg": "ok",
        "tenant_access_token": MOCK_TOKEN,
        "expire": mock.token_expire.unwrap_or(7200)
    }))
}

async fn mock_message(
    State(mock): State<Arc<MockFeishu>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(req): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {MOCK_TOKEN}"));
    if !authorized {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": 99_991_663, "msg": "Invalid access token for authorization" })),
        );
    }
    assert_eq!(query.get("receive_id_type").map(String::as_str), Some("chat_id"));

    mock.messages.lock().unwrap().push(req);

    if mock.message_code != 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": mock.message_code, "msg": "Bot is not in the chat" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "code": 0, "msg": "success", "data": { "message_id": "om_dc13264520392913993dd051dba21dcf" } })),
    )
}

/// Test config pointing the Feishu client at a mock server.
pub fn config_for_mock(server: &TestServer) -> Config {
    Config {
        feishu_base_url: server.url.clone(),
        ..Config::default_for_test()
    }
}
