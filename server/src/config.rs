//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Default Feishu open platform origin.
pub const DEFAULT_FEISHU_BASE_URL: &str = "https://open.feishu.cn";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:5000")
    pub bind_address: String,

    /// Feishu (Lark) application ID
    pub lark_app_id: String,

    /// Feishu (Lark) application secret
    pub lark_app_secret: String,

    /// Chat that receives every card
    pub feishu_chat_id: String,

    /// GitHub webhook shared secret.
    ///
    /// `None` disables signature verification entirely. This is insecure:
    /// anyone who can reach `/webhook` can post cards to the chat.
    pub github_webhook_secret: Option<String>,

    /// Feishu API origin (default: `https://open.feishu.cn`)
    pub feishu_base_url: String,

    /// Timeout for each Feishu API call in seconds (default: 10)
    pub feishu_timeout_secs: u64,

    /// Maximum webhook body size in bytes (default: 25MB, GitHub's cap)
    pub max_body_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".into()),
            lark_app_id: env::var("LARK_APP_ID").context("LARK_APP_ID must be set")?,
            lark_app_secret: env::var("LARK_APP_SECRET").context("LARK_APP_SECRET must be set")?,
            feishu_chat_id: env::var("FEISHU_CHAT_ID").context("FEISHU_CHAT_ID must be set")?,
            github_webhook_secret: env::var("GITHUB_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            feishu_base_url: env::var("FEISHU_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FEISHU_BASE_URL.into()),
            feishu_timeout_secs: env::var("FEISHU_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(25 * 1024 * 1024), // 25MB
        })
    }

    /// Check if webhook signature verification is enabled.
    #[must_use]
    pub const fn verification_enabled(&self) -> bool {
        self.github_webhook_secret.is_some()
    }

    /// Create a default configuration for testing.
    ///
    /// Verification is enabled with the secret `test-secret`; the Feishu
    /// origin points at a port nothing listens on.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".into(),
            lark_app_id: "cli_test".into(),
            lark_app_secret: "test-app-secret".into(),
            feishu_chat_id: "oc_test_chat".into(),
            github_webhook_secret: Some("test-secret".into()),
            feishu_base_url: "http://127.0.0.1:9".into(),
            feishu_timeout_secs: 5,
            max_body_size: 25 * 1024 * 1024,
        }
    }
}
