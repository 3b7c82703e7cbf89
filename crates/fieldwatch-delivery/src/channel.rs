// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The injectable delivery capability and its wire types.

use async_trait::async_trait;
use fieldwatch_core::ChatId;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An inline keyboard attached to an outbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
	pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
	pub fn is_empty(&self) -> bool {
		self.inline_keyboard.is_empty()
	}

	/// Append a row of buttons.
	pub fn push_row(&mut self, row: Vec<InlineKeyboardButton>) {
		if !row.is_empty() {
			self.inline_keyboard.push(row);
		}
	}
}

/// A single actionable button.
///
/// Exactly one of `callback_data` / `url` is set; the channel rejects
/// buttons carrying neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
	pub text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub callback_data: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

impl InlineKeyboardButton {
	pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			callback_data: Some(data.into()),
			url: None,
		}
	}

	pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			callback_data: None,
			url: Some(url.into()),
		}
	}
}

/// What a single delivery unit carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
	Text {
		text: String,
		keyboard: Option<InlineKeyboardMarkup>,
	},
	Location {
		lat: f64,
		lon: f64,
	},
}

/// An outbound message plus its delivery options.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
	pub payload: Payload,
	/// After a successful send, follow up with the static "back to main
	/// menu" prompt through the same retry policy.
	pub back_to_menu: bool,
}

impl OutboundMessage {
	pub fn text(text: impl Into<String>) -> Self {
		Self {
			payload: Payload::Text {
				text: text.into(),
				keyboard: None,
			},
			back_to_menu: false,
		}
	}

	pub fn text_with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
		let keyboard = if keyboard.is_empty() { None } else { Some(keyboard) };
		Self {
			payload: Payload::Text {
				text: text.into(),
				keyboard,
			},
			back_to_menu: false,
		}
	}

	pub fn location(lat: f64, lon: f64) -> Self {
		Self {
			payload: Payload::Location { lat, lon },
			back_to_menu: false,
		}
	}

	pub fn with_back_to_menu(mut self) -> Self {
		self.back_to_menu = true;
		self
	}
}

/// A messaging endpoint capable of sending a payload to a chat.
///
/// One instance is constructed at process start and injected everywhere a
/// component needs to send; tests use a recording double.
#[async_trait]
pub trait MessageChannel: Send + Sync {
	async fn send(&self, chat: ChatId, payload: &Payload) -> Result<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keyboard_skips_empty_rows() {
		let mut kb = InlineKeyboardMarkup::default();
		kb.push_row(vec![]);
		assert!(kb.is_empty());
		kb.push_row(vec![InlineKeyboardButton::callback("Main menu", "button:menu")]);
		assert_eq!(kb.inline_keyboard.len(), 1);
	}

	#[test]
	fn button_wire_shape_omits_unset_fields() {
		let btn = InlineKeyboardButton::callback("Main menu", "button:menu");
		let json = serde_json::to_string(&btn).unwrap();
		assert!(json.contains("callback_data"));
		assert!(!json.contains("url"));
	}

	#[test]
	fn empty_keyboard_is_dropped_from_outbound() {
		let msg = OutboundMessage::text_with_keyboard("hi", InlineKeyboardMarkup::default());
		match msg.payload {
			Payload::Text { keyboard, .. } => assert!(keyboard.is_none()),
			_ => panic!("expected text payload"),
		}
	}
}
