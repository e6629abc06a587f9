//! Telegram notification sink
//!
//! Fire-and-forget delivery of alert messages to a fixed chat. Send
//! failures are reported to the caller for logging and never roll back
//! pipeline state.

use crate::error::{BotError, Result};
use crate::types::Alert;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct Notifier {
    http: Client,
    /// `None` when Telegram is not configured; sends become no-ops.
    target: Option<Target>,
}

#[derive(Clone)]
struct Target {
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    parse_mode: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: Client::new(),
            target: Some(Target { bot_token, chat_id }),
        }
    }

    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            target: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Send an HTML-formatted message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<()> {
        let Some(target) = &self.target else {
            return Ok(());
        };

        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            target.bot_token
        );
        let request = SendMessageRequest {
            chat_id: target.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
        };

        let response: SendMessageResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(BotError::Notify(
                response
                    .description
                    .unwrap_or_else(|| "telegram rejected message".to_string()),
            ));
        }

        Ok(())
    }

    pub async fn alert(&self, alert: &Alert) -> Result<()> {
        self.send(&alert.text).await
    }

    pub async fn startup(&self, hour_start: u32, hour_end: u32) -> Result<()> {
        self.send(&format!(
            "✅ <b>Bot started.</b> Predictions run from {}:00 to {}:00.",
            hour_start, hour_end
        ))
        .await
    }
}
