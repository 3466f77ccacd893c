//! Webhook API Handlers
//!
//! `POST /webhook`: verify, dispatch, relay.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::dispatch::dispatch;
use super::signing;
use super::types::{StatusResponse, WebhookError, WebhookStatus};
use crate::api::AppState;

/// HMAC signature of the raw body (`sha256=<hex>`).
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Event name (`push`, `pull_request`, ...).
pub const EVENT_HEADER: &str = "x-github-event";

/// Unique delivery GUID, logged for correlation with GitHub's delivery log.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Parse the body as JSON, treating empty documents like a missing body.
fn parse_payload(body: &[u8]) -> Result<Value, WebhookError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| WebhookError::NoPayload)?;

    let empty = match &payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
    };
    if empty {
        return Err(WebhookError::NoPayload);
    }

    Ok(payload)
}

/// POST /webhook
#[instrument(skip_all, fields(event, delivery))]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StatusResponse>, WebhookError> {
    let event = header_str(&headers, EVENT_HEADER);
    let span = tracing::Span::current();
    span.record("event", event.unwrap_or("-"));
    span.record("delivery", header_str(&headers, DELIVERY_HEADER).unwrap_or("-"));

    let signature = header_str(&headers, SIGNATURE_HEADER).unwrap_or_default();
    if !signing::verify_signature(
        state.config.github_webhook_secret.as_deref(),
        &body,
        signature,
    ) {
        warn!("Rejected webhook with invalid signature");
        return Err(WebhookError::InvalidSignature);
    }

    let payload = parse_payload(&body)?;
    info!("Received GitHub event");

    let Some(card) = dispatch(event, &payload)? else {
        info!("No card for event, ignoring");
        return Ok(Json(StatusResponse {
            status: WebhookStatus::Ignored,
        }));
    };

    state.relay.send(&card).await?;

    Ok(Json(StatusResponse {
        status: WebhookStatus::Success,
    }))
}
