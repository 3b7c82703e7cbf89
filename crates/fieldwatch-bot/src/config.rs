// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Startup configuration.
//!
//! Secrets and connection strings come from clap args with env fallbacks;
//! recipient groups, farm lists, and monitor timing come from a TOML file.
//! A token or database URL that cannot be resolved is fatal at startup;
//! everything else has a default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use clap::Parser;
use fieldwatch_core::OperatingHours;
use serde::Deserialize;

use crate::error::{BotError, Result};

/// fieldwatch bot - farm monitoring and notifications over Telegram
#[derive(Parser, Debug)]
#[command(name = "fieldwatch-bot")]
pub struct Args {
	/// Bot API token (or set FIELDWATCH_BOT_TOKEN)
	#[arg(long, env = "FIELDWATCH_BOT_TOKEN")]
	pub token: Option<String>,

	/// Postgres connection string (or set DATABASE_URL)
	#[arg(long, env = "DATABASE_URL")]
	pub database_url: Option<String>,

	/// Path to the TOML config file
	#[arg(long, env = "FIELDWATCH_CONFIG", default_value = "fieldwatch.toml")]
	pub config: PathBuf,
}

impl Args {
	pub fn token(&self) -> Result<&str> {
		self.token
			.as_deref()
			.ok_or_else(|| BotError::Config("bot token required: use --token or FIELDWATCH_BOT_TOKEN".into()))
	}

	pub fn database_url(&self) -> Result<&str> {
		self.database_url
			.as_deref()
			.ok_or_else(|| BotError::Config("database URL required: use --database-url or DATABASE_URL".into()))
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
	#[serde(default)]
	pub farms: Vec<i32>,
	#[serde(default)]
	pub recipients: Recipients,
	#[serde(default)]
	pub monitor: MonitorSection,
	#[serde(default)]
	pub probe: ProbeSection,
	#[serde(default)]
	pub forecast: ForecastSection,
}

impl BotConfig {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)?;
		Ok(toml::from_str(&raw)?)
	}
}

/// Chat-id groups for each notification stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recipients {
	#[serde(default)]
	pub cameras: Vec<i64>,
	#[serde(default)]
	pub stations: Vec<i64>,
	#[serde(default)]
	pub imagery: Vec<i64>,
	#[serde(default)]
	pub rain_digest: Vec<i64>,
	#[serde(default)]
	pub forecast_digest: Vec<i64>,
	#[serde(default)]
	pub admins: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
	pub poll_interval_secs: u64,
	pub confirm_delay_secs: u64,
	pub suppression_secs: u64,
	pub imagery_poll_secs: u64,
	pub start_hour: u32,
	pub end_hour: u32,
	pub weekdays_only: bool,
	pub excluded_cameras: Vec<i32>,
	pub excluded_stations: Vec<i32>,
}

impl Default for MonitorSection {
	fn default() -> Self {
		Self {
			poll_interval_secs: 1,
			confirm_delay_secs: 60,
			suppression_secs: 7200,
			imagery_poll_secs: 5,
			start_hour: 8,
			end_hour: 17,
			weekdays_only: true,
			excluded_cameras: Vec::new(),
			excluded_stations: Vec::new(),
		}
	}
}

impl MonitorSection {
	pub fn operating_hours(&self) -> OperatingHours {
		let start = NaiveTime::from_hms_opt(self.start_hour.min(23), 0, 0)
			.unwrap_or(NaiveTime::MIN);
		let end = NaiveTime::from_hms_opt(self.end_hour.min(23), 0, 0)
			.unwrap_or(NaiveTime::MIN);
		OperatingHours::new(start, end, self.weekdays_only)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(self.poll_interval_secs)
	}

	pub fn confirm_delay(&self) -> Duration {
		Duration::from_secs(self.confirm_delay_secs)
	}

	pub fn suppression(&self) -> Duration {
		Duration::from_secs(self.suppression_secs)
	}

	pub fn imagery_poll(&self) -> Duration {
		Duration::from_secs(self.imagery_poll_secs)
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeSection {
	pub port: u16,
	pub timeout_secs: u64,
}

impl Default for ProbeSection {
	fn default() -> Self {
		Self {
			port: 80,
			timeout_secs: 3,
		}
	}
}

impl ProbeSection {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

/// Remote city forecast digest settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
	pub api_key: Option<String>,
	pub city: String,
	pub morning: String,
	pub evening: String,
}

impl Default for ForecastSection {
	fn default() -> Self {
		Self {
			api_key: None,
			city: "Volgograd,ru".to_string(),
			morning: "08:00".to_string(),
			evening: "20:00".to_string(),
		}
	}
}

impl ForecastSection {
	pub fn morning_time(&self) -> Result<NaiveTime> {
		parse_time(&self.morning)
	}

	pub fn evening_time(&self) -> Result<NaiveTime> {
		parse_time(&self.evening)
	}
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
	NaiveTime::parse_from_str(raw, "%H:%M")
		.map_err(|e| BotError::Config(format!("invalid time of day {raw:?}: {e}")))
}
