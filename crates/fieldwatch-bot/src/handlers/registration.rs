// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration flow.
//!
//! Applying records the user unconfirmed and pages the administrators with
//! approve/later/reject buttons; the verdict is pushed back to the
//! applicant.

use chrono::Local;
use fieldwatch_core::{ChatId, RecipientSet, Role};
use fieldwatch_delivery::{InlineKeyboardMarkup, MessageChannel, OutboundMessage};
use fieldwatch_menu::{build_keyboard, ButtonKind, CallbackAction, Verdict};
use fieldwatch_store::NewUser;
use tracing::info;

use super::Handlers;
use crate::error::Result;

impl<C: MessageChannel + 'static> Handlers<C> {
	pub(super) async fn apply_for_registration(
		&self,
		chat: ChatId,
		first_name: Option<String>,
	) -> Result<()> {
		if let Some(user) = self.repo.find_user(chat).await? {
			let text = if user.confirmed {
				"You are already registered. Use /menu."
			} else {
				"Your registration is awaiting approval."
			};
			self.reply(chat, OutboundMessage::text(text)).await;
			return Ok(());
		}

		let user = NewUser {
			chat_id: chat,
			name: first_name,
			surname: None,
			registered_at: Local::now().naive_local(),
			role_code: Role::View.code(),
		};
		self.repo.register_user(&user).await?;
		info!(chat = %chat, "registration application recorded");
		self.reply(
			chat,
			OutboundMessage::text("Your application has been submitted and is awaiting approval."),
		)
		.await;

		let admins: RecipientSet = self.config.recipients.admins.clone().into();
		if !admins.is_empty() {
			let who = user.name.as_deref().unwrap_or("(no name)");
			let text = format!("New registration request:\nName: {who}\nChat id: {chat}");
			let message = OutboundMessage::text_with_keyboard(text, verdict_keyboard(chat));
			self.sender.deliver(&admins, &message).await;
		}
		Ok(())
	}

	/// Configured admins rule on registrations and see the user list, as do
	/// programmers.
	async fn is_admin(&self, chat: ChatId) -> Result<bool> {
		Ok(self.config.recipients.admins.contains(&chat.0)
			|| self.role_of(chat).await? == Some(Role::Programmer))
	}

	pub(super) async fn rule_on_registration(
		&self,
		admin: ChatId,
		user: ChatId,
		verdict: Verdict,
	) -> Result<()> {
		if !self.is_admin(admin).await? {
			self.reply(admin, OutboundMessage::text("You are not allowed to rule on registrations."))
				.await;
			return Ok(());
		}

		match verdict {
			Verdict::Approve => {
				self.repo.confirm_registration(user).await?;
				info!(%user, %admin, "registration approved");
				self.reply(
					user,
					OutboundMessage::text("Your registration has been approved. Use /menu to get started."),
				)
				.await;
				self.reply(admin, OutboundMessage::text(format!("Approved {user}.")))
					.await;
			}
			Verdict::Later => {
				info!(%user, %admin, "registration deferred");
				self.reply(
					user,
					OutboundMessage::text("Your registration is still being reviewed."),
				)
				.await;
				self.reply(admin, OutboundMessage::text(format!("Deferred {user}.")))
					.await;
			}
			Verdict::Reject => {
				self.repo.remove_user(user).await?;
				info!(%user, %admin, "registration rejected");
				self.reply(user, OutboundMessage::text("Your registration has been declined."))
					.await;
				self.reply(admin, OutboundMessage::text(format!("Rejected {user}.")))
					.await;
			}
		}
		Ok(())
	}

	/// Admin command: one line per registered user.
	pub(super) async fn list_registered_users(&self, chat: ChatId) -> Result<()> {
		if !self.is_admin(chat).await? {
			self.reply(chat, OutboundMessage::text("This command is for administrators."))
				.await;
			return Ok(());
		}

		let mut users = self.repo.list_users().await?;
		if users.is_empty() {
			self.reply(chat, OutboundMessage::text("No registered users."))
				.await;
			return Ok(());
		}
		users.sort_by_key(|u| u.chat_id.0);

		let mut text = String::from("*Registered users*");
		for user in &users {
			let name = user.name.as_deref().unwrap_or("(no name)");
			let role = Role::from_code(user.role_code)
				.map(|r| r.to_string())
				.unwrap_or_else(|| format!("code {}", user.role_code));
			let status = if user.confirmed { "confirmed" } else { "pending" };
			text.push_str(&format!("\n{}: {name}, {role}, {status}", user.chat_id));
		}
		self.reply(chat, OutboundMessage::text(text)).await;
		Ok(())
	}
}

fn verdict_keyboard(user: ChatId) -> InlineKeyboardMarkup {
	let row = [Verdict::Approve, Verdict::Later, Verdict::Reject]
		.into_iter()
		.map(|verdict| {
			let label = match verdict {
				Verdict::Approve => "Approve",
				Verdict::Later => "Later",
				Verdict::Reject => "Reject",
			};
			ButtonKind::Action(
				label.to_string(),
				CallbackAction::ConfirmRegistration { user, verdict },
			)
		})
		.collect();
	build_keyboard(&[row])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verdict_keyboard_payloads_parse() {
		let markup = verdict_keyboard(ChatId(42));
		assert_eq!(markup.inline_keyboard[0].len(), 3);
		for button in &markup.inline_keyboard[0] {
			let data = button.callback_data.as_deref().unwrap();
			assert!(matches!(
				CallbackAction::parse(data).unwrap(),
				CallbackAction::ConfirmRegistration {
					user: ChatId(42),
					..
				}
			));
		}
	}
}
