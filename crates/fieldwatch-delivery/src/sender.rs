// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fan-out delivery with per-recipient retry.

use std::sync::Arc;

use fieldwatch_core::{ChatId, RecipientSet};
use tracing::{error, warn};

use crate::channel::{MessageChannel, OutboundMessage, Payload};
use crate::error::Result;
use crate::retry::RetryPolicy;

/// Decides whether a recipient gets the "back to main menu" follow-up.
///
/// Broadcast-only recipients never do; the bot wires a store-backed
/// implementation here so delivery stays decoupled from the data store.
#[async_trait::async_trait]
pub trait MenuGate: Send + Sync {
	async fn wants_menu_prompt(&self, chat: ChatId) -> bool;
}

/// Delivers a payload to one or many recipients, retrying each unit
/// independently until it succeeds or fails permanently.
///
/// No ordering is guaranteed between recipients in a fan-out; units run
/// concurrently and one slow or failing recipient never delays another.
pub struct ReliableSender<C> {
	channel: Arc<C>,
	policy: RetryPolicy,
	menu_prompt: Option<OutboundMessage>,
	menu_gate: Option<Arc<dyn MenuGate>>,
}

impl<C: MessageChannel> ReliableSender<C> {
	pub fn new(channel: Arc<C>) -> Self {
		Self {
			channel,
			policy: RetryPolicy::default(),
			menu_prompt: None,
			menu_gate: None,
		}
	}

	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Configure the static follow-up sent after messages flagged
	/// `back_to_menu`, and the gate deciding who receives it.
	pub fn with_menu_prompt(mut self, prompt: OutboundMessage, gate: Arc<dyn MenuGate>) -> Self {
		self.menu_prompt = Some(prompt);
		self.menu_gate = Some(gate);
		self
	}

	/// Deliver to every member of the recipient set.
	///
	/// Each member is an independent delivery unit; a permanent failure
	/// for one member is logged and dropped without affecting the rest.
	pub async fn deliver(&self, recipients: &RecipientSet, message: &OutboundMessage) {
		let units = recipients.iter().map(|chat| self.deliver_unit(chat, message));
		futures::future::join_all(units).await;
	}

	async fn deliver_unit(&self, chat: ChatId, message: &OutboundMessage) {
		if self.send_until_delivered(chat, &message.payload).await.is_err() {
			return;
		}

		if message.back_to_menu {
			if let Some(prompt) = &self.menu_prompt {
				let wants = match &self.menu_gate {
					Some(gate) => gate.wants_menu_prompt(chat).await,
					None => true,
				};
				if wants {
					let _ = self.send_until_delivered(chat, &prompt.payload).await;
				}
			}
		}
	}

	/// Retry-until-success loop for a single recipient.
	///
	/// Transient failures are logged and retried forever with capped
	/// backoff; a permanent rejection stops retrying for this recipient.
	async fn send_until_delivered(&self, chat: ChatId, payload: &Payload) -> Result<()> {
		let mut attempt = 0u32;
		loop {
			attempt += 1;
			match self.channel.send(chat, payload).await {
				Ok(()) => return Ok(()),
				Err(e) if e.is_transient() => {
					let delay = self.policy.jittered_delay(attempt);
					warn!(
						chat = %chat,
						attempt,
						delay_ms = delay.as_millis() as u64,
						error = %e,
						"delivery failed, retrying"
					);
					tokio::time::sleep(delay).await;
				}
				Err(e) => {
					error!(chat = %chat, attempt, error = %e, "permanent delivery failure, dropping message");
					return Err(e);
				}
			}
		}
	}
}
