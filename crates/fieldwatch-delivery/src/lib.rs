// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reliable fan-out message delivery for fieldwatch.
//!
//! This crate provides:
//! - [`MessageChannel`]: the injectable delivery capability (text and
//!   location payloads to a numeric chat id)
//! - [`RetryPolicy`]: infinite retry with capped exponential backoff for
//!   transient channel failures
//! - [`ReliableSender`]: fan-out over a recipient set where every member is
//!   an independent delivery unit
//! - [`TelegramChannel`]: the production channel speaking the Telegram Bot
//!   API over reqwest
//!
//! The channel is constructed once at process start and passed explicitly
//! to every component that sends messages; tests substitute a double.

pub mod channel;
pub mod error;
pub mod retry;
pub mod sender;
pub mod telegram;

pub use channel::{
	InlineKeyboardButton, InlineKeyboardMarkup, MessageChannel, OutboundMessage, Payload,
};
pub use error::{DeliveryError, Result};
pub use retry::RetryPolicy;
pub use sender::{MenuGate, ReliableSender};
pub use telegram::{BotToken, CallbackQuery, Chat, Contact, Message, TelegramChannel, Update};
