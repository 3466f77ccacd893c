//! GitHub-Feishu Bot Server
//!
//! Receives signed GitHub webhooks, renders supported events as Feishu
//! interactive cards and posts them to a single group chat.

pub mod api;
pub mod cards;
pub mod config;
pub mod relay;
pub mod webhooks;
