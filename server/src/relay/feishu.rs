//! Feishu (Lark) Open Platform Client
//!
//! Posts interactive cards to a group chat through the IM v1 message API,
//! authenticating with a self-built app's tenant access token.
//!
//! Flow:
//! - `POST /open-apis/auth/v3/tenant_access_token/internal` exchanges the app
//!   id/secret for a token, cached until shortly before it expires.
//! - `POST /open-apis/im/v1/messages?receive_id_type=chat_id` sends the card.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{MessageRelay, RelayError};
use crate::cards::CardDocument;
use crate::config::Config;

const TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";
const MESSAGE_PATH: &str = "/open-apis/im/v1/messages";

/// Refresh tokens this long before Feishu says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(300);

/// Codes Feishu returns for an invalid or expired access token.
const INVALID_TOKEN_CODES: [i64; 3] = [99_991_661, 99_991_663, 99_991_668];

/// Feishu message client bound to one destination chat.
pub struct FeishuClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_secret: String,
    chat_id: String,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    tenant_access_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    expire: u64,
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    receive_id: &'a str,
    msg_type: &'a str,
    /// The card, JSON-encoded into a string.
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<MessageData>,
}

#[derive(Deserialize)]
struct MessageData {
    #[serde(default)]
    message_id: Option<String>,
}

impl FeishuClient {
    /// Create a client from the server configuration.
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.feishu_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.feishu_base_url.clone(),
            app_id: config.lark_app_id.clone(),
            app_secret: config.lark_app_secret.clone(),
            chat_id: config.feishu_chat_id.clone(),
            token: Mutex::new(None),
        })
    }

    /// Current tenant access token, fetching a new one when none is cached or
    /// the cached one is about to expire.
    async fn tenant_access_token(&self) -> Result<String, RelayError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting Feishu tenant access token");
        let resp: TokenResponse = self
            .http
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .json(&TokenRequest {
                app_id: &self.app_id,
                app_secret: &self.app_secret,
            })
            .send()
            .await?
            .json()
            .await?;

        if resp.code != 0 {
            return Err(RelayError::Auth(format!("code {}: {}", resp.code, resp.msg)));
        }
        let value = resp
            .tenant_access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RelayError::Auth("response carried no token".to_string()))?;

        let lifetime = Duration::from_secs(resp.expire).saturating_sub(TOKEN_REFRESH_MARGIN);
        // An expiry too far out to represent is not cached.
        *cached = Instant::now()
            .checked_add(lifetime)
            .map(|refresh_at| CachedToken {
                value: value.clone(),
                refresh_at,
            });

        Ok(value)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }
}

#[async_trait]
impl MessageRelay for FeishuClient {
    async fn send(&self, card: &CardDocument) -> Result<(), RelayError> {
        let body = CreateMessageRequest {
            receive_id: &self.chat_id,
            msg_type: "interactive",
            content: card.to_json()?,
        };
        let token = self.tenant_access_token().await?;

        let resp = self
            .http
            .post(format!("{}{MESSAGE_PATH}", self.base_url))
            .query(&[("receive_id_type", "chat_id")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let api: ApiResponse = match resp.json().await {
            Ok(api) => api,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(RelayError::Api {
                    code: i64::from(status.as_u16()),
                    msg: status.to_string(),
                })
            }
        };

        if !status.is_success() || api.code != 0 {
            warn!(
                status = status.as_u16(),
                code = api.code,
                msg = %api.msg,
                "Feishu rejected message"
            );
            if INVALID_TOKEN_CODES.contains(&api.code) {
                self.forget_token().await;
            }
            return Err(RelayError::Api {
                code: api.code,
                msg: api.msg,
            });
        }

        let message_id = api.data.and_then(|d| d.message_id);
        info!(chat_id = %self.chat_id, message_id = ?message_id, "Card sent to Feishu");
        Ok(())
    }
}
