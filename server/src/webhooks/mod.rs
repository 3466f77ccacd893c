//! GitHub Webhook Receiver
//!
//! Verifies `X-Hub-Signature-256`, maps supported events to Feishu cards and
//! relays them. Unsupported events are acknowledged and ignored.

pub mod dispatch;
pub mod events;
pub mod handlers;
pub mod signing;
pub mod types;
