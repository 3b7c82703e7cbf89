// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The long-poll update loop.
//!
//! Each update is handed to its handler on a spawned task, so one slow
//! query never stalls the poll. A failed poll backs off briefly and keeps
//! going; only cancellation stops the loop.

use std::sync::Arc;
use std::time::Duration;

use fieldwatch_core::ChatId;
use fieldwatch_delivery::{TelegramChannel, Update};
use fieldwatch_monitor::{spawn_named, CancellationToken};
use tracing::{debug, info, warn};

use crate::handlers::Handlers;

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct UpdateLoop {
	channel: Arc<TelegramChannel>,
	handlers: Arc<Handlers<TelegramChannel>>,
	token: CancellationToken,
}

impl UpdateLoop {
	pub fn new(channel: Arc<TelegramChannel>, handlers: Arc<Handlers<TelegramChannel>>) -> Self {
		Self {
			channel,
			handlers,
			token: CancellationToken::new(),
		}
	}

	pub fn cancellation_token(&self) -> CancellationToken {
		self.token.clone()
	}

	pub async fn run(self) {
		info!("update loop started");
		let mut offset = 0i64;
		loop {
			if self.token.is_cancelled() {
				break;
			}
			let updates = match self.channel.get_updates(offset).await {
				Ok(updates) => updates,
				Err(e) => {
					warn!(error = %e, "getUpdates failed, backing off");
					tokio::time::sleep(POLL_RETRY_DELAY).await;
					continue;
				}
			};
			for update in updates {
				offset = offset.max(update.update_id + 1);
				self.dispatch(update);
			}
		}
		info!("update loop stopped");
	}

	fn dispatch(&self, update: Update) {
		if let Some(query) = update.callback_query {
			let channel = Arc::clone(&self.channel);
			let handlers = Arc::clone(&self.handlers);
			spawn_named("callback-handler", async move {
				if let Err(e) = channel.answer_callback_query(&query.id).await {
					debug!(error = %e, "answerCallbackQuery failed");
				}
				// Retire the menu message the button lived on.
				if let Some(message) = &query.message {
					if let Err(e) = channel
						.delete_message(ChatId(message.chat.id), message.message_id)
						.await
					{
						debug!(error = %e, "deleteMessage failed");
					}
				}
				if let Some(data) = query.data {
					handlers.handle_callback(ChatId(query.from.id), &data).await;
				}
			});
		} else if let Some(message) = update.message {
			let chat = ChatId(message.chat.id);
			let handlers = Arc::clone(&self.handlers);
			spawn_named("message-handler", async move {
				if let Some(contact) = message.contact {
					handlers.handle_contact(chat, contact.first_name).await;
				} else if let Some(text) = message.text {
					handlers.handle_text(chat, &text).await;
				}
			});
		}
	}
}
