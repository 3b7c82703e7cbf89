// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Update handlers.
//!
//! Each inbound message or button press is handled in its own spawned task;
//! a handler failure is logged and answered with a generic reply, never
//! propagated into the update loop.

mod menus;
mod queries;
mod registration;

use std::sync::Arc;

use fieldwatch_core::{ChatId, RecipientSet, Role};
use fieldwatch_delivery::{MessageChannel, OutboundMessage, ReliableSender};
use fieldwatch_menu::CallbackAction;
use fieldwatch_store::{Prober, TelemetryRepository};
use tracing::{info, instrument, warn};

use crate::config::BotConfig;
use crate::error::{BotError, Result};

const UNAVAILABLE: &str = "The service is temporarily unavailable, please try again later.";
const FALLBACK: &str = "I did not understand that. Use /menu to see what I can do.";

pub struct Handlers<C> {
	repo: Arc<dyn TelemetryRepository>,
	prober: Arc<dyn Prober>,
	sender: Arc<ReliableSender<C>>,
	config: Arc<BotConfig>,
}

impl<C: MessageChannel + 'static> Handlers<C> {
	pub fn new(
		repo: Arc<dyn TelemetryRepository>,
		prober: Arc<dyn Prober>,
		sender: Arc<ReliableSender<C>>,
		config: Arc<BotConfig>,
	) -> Self {
		Self {
			repo,
			prober,
			sender,
			config,
		}
	}

	/// Handle a plain text message (commands and fallback).
	#[instrument(skip(self, text), fields(chat = %chat))]
	pub async fn handle_text(&self, chat: ChatId, text: &str) {
		let outcome = match text.trim() {
			"/start" => self.cmd_start(chat).await,
			"/help" => self.cmd_help(chat).await,
			"/reg" => self.apply_for_registration(chat, None).await,
			"/contact" => self.cmd_contact(chat).await,
			"/menu" => self.send_main_menu(chat).await,
			"/users" => self.list_registered_users(chat).await,
			_ => {
				self.reply(chat, OutboundMessage::text(FALLBACK)).await;
				Ok(())
			}
		};
		self.contain(chat, outcome).await;
	}

	/// Handle a shared phone contact (registration enrichment).
	#[instrument(skip(self, first_name), fields(chat = %chat))]
	pub async fn handle_contact(&self, chat: ChatId, first_name: Option<String>) {
		let outcome = self.apply_for_registration(chat, first_name).await;
		self.contain(chat, outcome).await;
	}

	/// Handle a callback payload from an inline button.
	#[instrument(skip(self, data), fields(chat = %chat))]
	pub async fn handle_callback(&self, chat: ChatId, data: &str) {
		let action = match CallbackAction::parse(data) {
			Ok(action) => action,
			Err(e) => {
				warn!(payload = data, error = %e, "rejected callback payload");
				self.reply(chat, OutboundMessage::text(FALLBACK)).await;
				return;
			}
		};
		info!(?action, "dispatching callback");
		let outcome = self.dispatch(chat, action).await;
		self.contain(chat, outcome).await;
	}

	async fn dispatch(&self, chat: ChatId, action: CallbackAction) -> Result<()> {
		match action {
			CallbackAction::Menu => self.send_main_menu(chat).await,
			CallbackAction::Register => self.apply_for_registration(chat, None).await,
			CallbackAction::ConfirmRegistration { user, verdict } => {
				self.rule_on_registration(chat, user, verdict).await
			}
			CallbackAction::Help => self.cmd_help(chat).await,
			CallbackAction::Weather { farm } => self.weather(chat, farm).await,
			CallbackAction::Archive {
				farm,
				station,
				week,
			} => self.archive(chat, farm, station, week).await,
			CallbackAction::Forecast { farm, zone, date } => {
				self.forecast(chat, farm, zone, date).await
			}
			CallbackAction::Cameras => self.camera_status(chat).await,
			CallbackAction::Stations => self.station_status(chat).await,
			CallbackAction::Battery { farm } => self.battery(chat, farm).await,
		}
	}

	/// A store failure is answered with a generic reply; anything else is
	/// only logged.
	async fn contain(&self, chat: ChatId, outcome: Result<()>) {
		match outcome {
			Ok(()) => {}
			Err(BotError::Store(e)) => {
				warn!(chat = %chat, error = %e, "store failure while handling update");
				self.reply(chat, OutboundMessage::text(UNAVAILABLE)).await;
			}
			Err(e) => {
				warn!(chat = %chat, error = %e, "handler failed");
			}
		}
	}

	async fn reply(&self, chat: ChatId, message: OutboundMessage) {
		self.sender
			.deliver(&RecipientSet::single(chat), &message)
			.await;
	}

	async fn role_of(&self, chat: ChatId) -> Result<Option<Role>> {
		Ok(self.repo.role_of(chat).await?)
	}

	async fn cmd_start(&self, chat: ChatId) -> Result<()> {
		match self.role_of(chat).await? {
			Some(_) if self.repo.registration_confirmed(chat).await? => {
				self.send_main_menu(chat).await
			}
			Some(_) => {
				self.reply(
					chat,
					OutboundMessage::text("Your registration is awaiting approval."),
				)
				.await;
				Ok(())
			}
			None => {
				self.reply(
					chat,
					OutboundMessage::text(
						"Welcome to fieldwatch.\nUse /reg to apply for access, or /help for more information.",
					),
				)
				.await;
				Ok(())
			}
		}
	}

	async fn cmd_help(&self, chat: ChatId) -> Result<()> {
		self.reply(
			chat,
			OutboundMessage::text(
				"*fieldwatch help*\n\
				 /menu shows your menu.\n\
				 /reg applies for access.\n\
				 /contact shows who to call when something is broken.\n\
				 Weather, archives, forecasts, and equipment status are behind the menu buttons.",
			),
		)
		.await;
		Ok(())
	}

	async fn cmd_contact(&self, chat: ChatId) -> Result<()> {
		self.reply(
			chat,
			OutboundMessage::text(
				"*Contacts*\nOperations office: +7 (8442) 00-00-00\nOn-duty engineer: +7 (8442) 00-00-01",
			),
		)
		.await;
		Ok(())
	}

	async fn send_main_menu(&self, chat: ChatId) -> Result<()> {
		match self.role_of(chat).await? {
			None => {
				self.reply(
					chat,
					OutboundMessage::text("You are not registered. Use /reg to apply."),
				)
				.await;
			}
			Some(role) if !self.repo.registration_confirmed(chat).await? => {
				info!(chat = %chat, %role, "menu requested before confirmation");
				self.reply(
					chat,
					OutboundMessage::text("Your registration is awaiting approval."),
				)
				.await;
			}
			Some(role) if !role.has_menu() => {
				self.reply(
					chat,
					OutboundMessage::text("This account only receives broadcast notifications."),
				)
				.await;
			}
			Some(role) => {
				let keyboard = menus::main_menu(role);
				self.reply(chat, OutboundMessage::text_with_keyboard("Main menu:", keyboard))
					.await;
			}
		}
		Ok(())
	}
}

/// Store-backed gate for the "back to main menu" follow-up.
pub struct StoreMenuGate {
	repo: Arc<dyn TelemetryRepository>,
}

impl StoreMenuGate {
	pub fn new(repo: Arc<dyn TelemetryRepository>) -> Self {
		Self { repo }
	}
}

#[async_trait::async_trait]
impl fieldwatch_delivery::MenuGate for StoreMenuGate {
	async fn wants_menu_prompt(&self, chat: ChatId) -> bool {
		match self.repo.role_of(chat).await {
			Ok(Some(role)) => role.has_menu(),
			Ok(None) => false,
			Err(e) => {
				warn!(chat = %chat, error = %e, "menu gate lookup failed");
				false
			}
		}
	}
}

#[cfg(test)]
mod tests;
