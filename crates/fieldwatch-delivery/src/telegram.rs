// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Production [`MessageChannel`] speaking the Telegram Bot API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use fieldwatch_core::ChatId;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::channel::{MessageChannel, Payload};
use crate::error::{DeliveryError, Result};

/// Bot API token. The raw value never appears in logs or debug output.
#[derive(Clone)]
pub struct BotToken(String);

impl BotToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for BotToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("BotToken(redacted)")
	}
}

impl From<String> for BotToken {
	fn from(token: String) -> Self {
		Self(token)
	}
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
	ok: bool,
	result: Option<T>,
	error_code: Option<i32>,
	description: Option<String>,
}

impl<T> ApiResponse<T> {
	fn into_result(self) -> Result<T> {
		if self.ok {
			self.result.ok_or_else(|| DeliveryError::Api {
				code: 0,
				description: "ok response with no result".into(),
			})
		} else {
			Err(DeliveryError::Api {
				code: self.error_code.unwrap_or(0),
				description: self.description.unwrap_or_else(|| "unknown error".into()),
			})
		}
	}
}

/// An incoming update from the long-poll loop.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
	pub update_id: i64,
	#[serde(default)]
	pub message: Option<Message>,
	#[serde(default)]
	pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
	pub message_id: i64,
	pub chat: Chat,
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
	pub id: i64,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub username: Option<String>,
}

/// A shared phone contact, used during registration.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
	pub phone_number: String,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
	pub id: String,
	pub from: Chat,
	#[serde(default)]
	pub message: Option<Message>,
	#[serde(default)]
	pub data: Option<String>,
}

const API_BASE: &str = "https://api.telegram.org";

/// Long-poll timeout passed to `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Telegram Bot API client.
///
/// Text messages are sent with Markdown parse mode, matching the composed
/// alert and menu bodies.
pub struct TelegramChannel {
	http: reqwest::Client,
	base: String,
	token: BotToken,
}

impl TelegramChannel {
	pub fn new(token: BotToken) -> Result<Self> {
		let http = reqwest::Client::builder()
			// Must exceed the long-poll timeout or getUpdates aborts early.
			.timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
			.build()?;
		Ok(Self {
			http,
			base: API_BASE.to_string(),
			token,
		})
	}

	/// Point the client at a different API host. Test servers use this.
	pub fn with_base(mut self, base: impl Into<String>) -> Self {
		self.base = base.into();
		self
	}

	fn url(&self, method: &str) -> String {
		format!("{}/bot{}/{}", self.base, self.token.as_str(), method)
	}

	async fn call<T: serde::de::DeserializeOwned>(
		&self,
		method: &str,
		body: &serde_json::Value,
	) -> Result<T> {
		let response = self.http.post(self.url(method)).json(body).send().await?;
		let envelope: ApiResponse<T> = response.json().await?;
		envelope.into_result()
	}

	#[instrument(skip(self, text), fields(chat = %chat))]
	pub async fn send_message(
		&self,
		chat: ChatId,
		text: &str,
		keyboard: Option<&crate::channel::InlineKeyboardMarkup>,
	) -> Result<()> {
		let mut body = json!({
			"chat_id": chat.0,
			"text": text,
			"parse_mode": "Markdown",
		});
		if let Some(kb) = keyboard {
			body["reply_markup"] = serde_json::to_value(kb)?;
		}
		self.call::<serde_json::Value>("sendMessage", &body).await?;
		Ok(())
	}

	#[instrument(skip(self), fields(chat = %chat))]
	pub async fn send_location(&self, chat: ChatId, lat: f64, lon: f64) -> Result<()> {
		let body = json!({
			"chat_id": chat.0,
			"latitude": lat,
			"longitude": lon,
		});
		self.call::<serde_json::Value>("sendLocation", &body).await?;
		Ok(())
	}

	/// Long-poll for updates past `offset`.
	pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
		let body = json!({
			"offset": offset,
			"timeout": POLL_TIMEOUT_SECS,
			"allowed_updates": ["message", "callback_query"],
		});
		self.call("getUpdates", &body).await
	}

	/// Acknowledge a callback query so the client stops its spinner.
	#[instrument(skip(self))]
	pub async fn answer_callback_query(&self, query_id: &str) -> Result<()> {
		let body = json!({ "callback_query_id": query_id });
		self.call::<serde_json::Value>("answerCallbackQuery", &body).await?;
		Ok(())
	}

	/// Remove a message, used to retire stale menus after a button press.
	#[instrument(skip(self), fields(chat = %chat))]
	pub async fn delete_message(&self, chat: ChatId, message_id: i64) -> Result<()> {
		let body = json!({
			"chat_id": chat.0,
			"message_id": message_id,
		});
		self.call::<serde_json::Value>("deleteMessage", &body).await?;
		Ok(())
	}
}

#[async_trait]
impl MessageChannel for TelegramChannel {
	async fn send(&self, chat: ChatId, payload: &Payload) -> Result<()> {
		match payload {
			Payload::Text { text, keyboard } => {
				self.send_message(chat, text, keyboard.as_ref()).await
			}
			Payload::Location { lat, lon } => self.send_location(chat, *lat, *lon).await,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_debug_is_redacted() {
		let token = BotToken::new("123456:ABC-secret");
		let rendered = format!("{token:?}");
		assert!(!rendered.contains("secret"));
		assert_eq!(rendered, "BotToken(redacted)");
	}

	#[test]
	fn error_envelope_maps_to_api_error() {
		let raw = r#"{"ok":false,"error_code":403,"description":"bot was blocked by the user"}"#;
		let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(raw).unwrap();
		match envelope.into_result() {
			Err(DeliveryError::Api { code, description }) => {
				assert_eq!(code, 403);
				assert_eq!(description, "bot was blocked by the user");
			}
			other => panic!("expected api error, got {other:?}"),
		}
	}

	#[test]
	fn update_parses_message_and_callback_shapes() {
		let raw = r#"{
			"update_id": 10,
			"message": {
				"message_id": 1,
				"chat": {"id": 42, "first_name": "Ann"},
				"text": "/start"
			}
		}"#;
		let update: Update = serde_json::from_str(raw).unwrap();
		assert_eq!(update.update_id, 10);
		assert_eq!(update.message.unwrap().chat.id, 42);

		let raw = r#"{
			"update_id": 11,
			"callback_query": {
				"id": "q1",
				"from": {"id": 42},
				"data": "button:weather,agro:3"
			}
		}"#;
		let update: Update = serde_json::from_str(raw).unwrap();
		let query = update.callback_query.unwrap();
		assert_eq!(query.data.as_deref(), Some("button:weather,agro:3"));
	}

	#[test]
	fn contact_update_carries_phone() {
		let raw = r#"{
			"update_id": 12,
			"message": {
				"message_id": 2,
				"chat": {"id": 42},
				"contact": {"phone_number": "+27821234567", "user_id": 42}
			}
		}"#;
		let update: Update = serde_json::from_str(raw).unwrap();
		let contact = update.message.unwrap().contact.unwrap();
		assert_eq!(contact.phone_number, "+27821234567");
		assert_eq!(contact.user_id, Some(42));
	}
}
