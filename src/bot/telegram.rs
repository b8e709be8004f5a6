//! Minimal Telegram Bot API client.
//!
//! Only the handful of methods the bot needs are implemented: long polling
//! with `getUpdates`, plain text messages with optional inline keyboards, and
//! callback acknowledgements. All calls are JSON `POST`s to
//! `{api_base}/bot{token}/{method}`.

use crate::config::TelegramSettings;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Chat identifier.
pub type ChatId = i64;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// The message carrying the pressed button, if it is still accessible.
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// A keyboard with one button per row.
    pub fn column(buttons: impl IntoIterator<Item = InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// The chat operations handlers rely on.
pub trait ChatApi {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Box<dyn Error>>;

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Box<dyn Error>>;

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), Box<dyn Error>>;
}

pub struct TelegramClient {
    client: Client,
    /// `{api_base}/bot{token}/`; contains the secret token, never log it.
    method_base: Url,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(token: &str, settings: &TelegramSettings) -> Result<Self, Box<dyn Error>> {
        // Tokens look like `123:abc`; joining them as a relative URL would
        // read `123` as a scheme, so the base is assembled as text.
        let method_base = Url::parse(&format!(
            "{}/bot{token}/",
            settings.api_base.trim_end_matches('/')
        ))?;
        // Long polls must be allowed to outlive the poll timeout itself.
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.poll_timeout_secs + 10))
            .build()?;
        Ok(Self {
            client,
            method_base,
            poll_timeout_secs: settings.poll_timeout_secs,
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, Box<dyn Error>> {
        Ok(self.method_base.join(method)?)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, Box<dyn Error>> {
        let response = self
            .client
            .post(self.method_url(method)?)
            .json(body)
            .send()
            .await
            // reqwest errors carry the request URL, which holds the token
            .map_err(|e| format!("{method} request failed: {}", e.without_url()))?;
        let text = response
            .text()
            .await
            .map_err(|e| format!("{method} response unreadable: {}", e.without_url()))?;

        let parsed: ApiResponse<T> = serde_json::from_str(&text)?;
        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(format!(
                "{method} rejected: {}",
                description.unwrap_or_else(|| "no description".to_string())
            )
            .into()),
        }
    }

    /// Long-poll for updates newer than `offset`.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, Box<dyn Error>> {
        let body = json!({
            "offset": offset,
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        let updates: Vec<Update> = self.call("getUpdates", &body).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), "Received updates");
        }
        Ok(updates)
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish_non_exhaustive()
    }
}

fn message_body(chat_id: ChatId, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Value {
    let mut body = json!({ "chat_id": chat_id, "text": text });
    if let Some(keyboard) = keyboard {
        body["reply_markup"] = json!(keyboard);
    }
    body
}

impl ChatApi for TelegramClient {
    #[instrument(level = "debug", skip(self, text, keyboard))]
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Box<dyn Error>> {
        let _: Value = self
            .call("sendMessage", &message_body(chat_id, text, keyboard))
            .await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self, text, keyboard))]
    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Box<dyn Error>> {
        let mut body = message_body(chat_id, text, keyboard);
        body["message_id"] = json!(message_id);
        let _: Value = self.call("editMessageText", &body).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), Box<dyn Error>> {
        let _: Value = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_query_id }),
            )
            .await?;
        Ok(())
    }
}
