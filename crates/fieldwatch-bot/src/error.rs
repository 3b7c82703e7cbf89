// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the bot binary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
	#[error("configuration error: {0}")]
	Config(String),

	#[error("cannot read config file: {0}")]
	Io(#[from] std::io::Error),

	#[error("cannot parse config file: {0}")]
	Toml(#[from] toml::de::Error),

	#[error(transparent)]
	Store(#[from] fieldwatch_store::StoreError),

	#[error(transparent)]
	Delivery(#[from] fieldwatch_delivery::DeliveryError),

	#[error(transparent)]
	Menu(#[from] fieldwatch_menu::MenuError),

	#[error("database connection failed: {0}")]
	Database(#[from] sqlx::Error),

	#[error("forecast API error: {0}")]
	ForecastApi(#[from] reqwest::Error),
}
