//! Webhook Types
//!
//! Response bodies and the error taxonomy of the webhook endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::relay::RelayError;

/// Outcome reported for a request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    /// A card was built and relayed.
    Success,
    /// The event was valid but produces no card.
    Ignored,
}

/// `{"status": "..."}` body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: WebhookStatus,
}

/// `{"error": "..."}` body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Webhook errors.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// `X-Hub-Signature-256` missing or wrong.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body empty, not JSON, or an empty JSON value.
    #[error("No payload")]
    NoPayload,

    /// Body is JSON but lacks fields the event's card needs.
    #[error("Invalid payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Card could not be delivered to the chat.
    #[error("Failed to send message")]
    Relay(#[from] RelayError),

    /// Anything else.
    #[error("Internal server error")]
    Internal(String),
}

impl WebhookError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::NoPayload | Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::Relay(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match &self {
            Self::Relay(e) => tracing::error!(error = %e, "Failed to send Feishu message"),
            Self::Internal(detail) => tracing::error!(detail = %detail, "Webhook handling failed"),
            _ => {}
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (self.status_code(), body).into_response()
    }
}
