//! Message Relay
//!
//! Hands finished cards to the chat platform. One attempt per card; failures
//! are reported to the caller, never retried.

pub mod feishu;

use async_trait::async_trait;
use thiserror::Error;

use crate::cards::CardDocument;

pub use feishu::FeishuClient;

/// Relay errors.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Network or protocol fault talking to the platform.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Platform answered with a non-zero code or a non-success status.
    #[error("Feishu API error {code}: {msg}")]
    Api { code: i64, msg: String },

    /// Could not obtain an access token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Card could not be serialized.
    #[error("Card encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sends a card to the configured destination chat.
#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn send(&self, card: &CardDocument) -> Result<(), RelayError>;
}
