//! Telegram Bot API transport
//!
//! `POST {api_base}/bot{token}/sendMessage` with a plain-text body. The API
//! answers with a JSON envelope on success and on most errors, so non-2xx
//! statuses are still decoded for their `description`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

use super::{Delivery, MessageTransport};
use crate::config::WatchConfig;
use crate::errors::NotifyError;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<SentMessage>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    #[serde(default)]
    message_id: Option<i64>,
}

/// Telegram `sendMessage` client for one chat
#[derive(Clone)]
pub struct TelegramTransport {
    client: Client,
    endpoint: String,
    api_base: String,
    chat_id: String,
}

impl fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramTransport")
            .field("endpoint", &format!("{}/bot<redacted>/sendMessage", self.api_base))
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramTransport {
    pub fn new(
        api_base: &str,
        token: &str,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::Transport(format!("Failed to create HTTP client: {e}")))?;

        let api_base = api_base.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            endpoint: format!("{api_base}/bot{token}/sendMessage"),
            api_base,
            chat_id: chat_id.into(),
        })
    }

    pub fn from_config(config: &WatchConfig) -> Result<Self, NotifyError> {
        Self::new(
            config.telegram_api_base(),
            config.telegram_token(),
            config.telegram_chat_id(),
        )
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: false,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let raw = response.text().await?;

        let parsed: ApiResponse = serde_json::from_str(&raw).map_err(|e| {
            NotifyError::Decode(format!("HTTP {status}: {e}"))
        })?;

        if !parsed.ok {
            let description = parsed
                .description
                .unwrap_or_else(|| format!("HTTP {status} without description"));
            error!("Telegram API error: {}", description);
            return Err(NotifyError::Rejected(description));
        }

        let message_id = parsed
            .result
            .and_then(|r| r.message_id)
            .ok_or(NotifyError::MissingAck)?;

        debug!("Telegram OK: {}", message_id);
        Ok(Delivery { message_id })
    }
}
