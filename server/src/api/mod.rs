//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{config::Config, relay::MessageRelay, webhooks, webhooks::types::WebhookError};

/// Human-readable service name reported by `GET /`.
pub const SERVICE_NAME: &str = "GitHub-Feishu Bot";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Where finished cards go
    pub relay: Arc<dyn MessageRelay>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, relay: Arc<dyn MessageRelay>) -> Self {
        Self {
            config: Arc::new(config),
            relay,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        // GitHub webhook receiver
        .route("/webhook", post(webhooks::handlers::receive_webhook))
        // Health check
        .route("/health", get(health_check))
        // Service descriptor
        .route("/", get(index))
        // Middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_size))
        // State
        .with_state(state)
}

/// Turn a handler panic into a `500` JSON error instead of a dropped connection.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    WebhookError::Internal(detail).into_response()
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Server local time, ISO-8601
    timestamp: String,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

/// Service descriptor response.
#[derive(Serialize)]
struct IndexResponse {
    service: &'static str,
    status: &'static str,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct Endpoints {
    webhook: &'static str,
    health: &'static str,
}

/// GET /
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME,
        status: "running",
        endpoints: Endpoints {
            webhook: "/webhook",
            health: "/health",
        },
    })
}
