//! Configuration types for the Heybox adapter

use serde::Deserialize;
use std::time::Duration;

/// Default channel message send endpoint
pub const DEFAULT_SEND_URL: &str = "https://chat.xiaoheihe.cn/chatroom/v2/channel_msg/send";

/// Default image upload endpoint
pub const DEFAULT_UPLOAD_URL: &str = "https://chat-upload.xiaoheihe.cn/upload";

/// Platform version string sent with every message
pub const DEFAULT_CHAT_VERSION: &str = "1.22.2";

/// Bot identity and credential
#[derive(Debug, Deserialize, Clone)]
pub struct BotInfo {
    /// Bot account id, used in logs
    #[serde(default)]
    pub bot_id: String,

    /// Credential sent in the `token` header
    pub token: String,
}

impl BotInfo {
    pub fn new(bot_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            token: token.into(),
        }
    }
}

/// Endpoints and request settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_send_url")]
    pub send_url: String,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    #[serde(default = "default_chat_version")]
    pub chat_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_send_url() -> String {
    DEFAULT_SEND_URL.to_string()
}

fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

fn default_chat_version() -> String {
    DEFAULT_CHAT_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            send_url: default_send_url(),
            upload_url: default_upload_url(),
            chat_version: default_chat_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Point both endpoints at `base`, e.g. a local mock server
    #[must_use]
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            send_url: format!("{base}/chatroom/v2/channel_msg/send"),
            upload_url: format!("{base}/upload"),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
