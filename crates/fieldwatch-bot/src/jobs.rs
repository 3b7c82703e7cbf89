// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scheduled digest jobs.
//!
//! A digest that cannot be computed this cycle returns an error; the
//! scheduler logs it and keeps its cadence.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use fieldwatch_core::{compose_rain_summary, RainfallRow, RecipientSet};
use fieldwatch_delivery::{MessageChannel, OutboundMessage, ReliableSender};
use fieldwatch_monitor::{JobError, RecurringJob};
use fieldwatch_store::TelemetryRepository;
use serde::Deserialize;
use tracing::info;

use crate::error::Result;

/// The cut-over hour for the daily rainfall window.
const RAIN_WINDOW_HOUR: u32 = 8;

/// Daily rainfall summary across every station.
pub struct RainSummaryJob<C> {
	repo: Arc<dyn TelemetryRepository>,
	sender: Arc<ReliableSender<C>>,
	recipients: RecipientSet,
}

impl<C: MessageChannel + 'static> RainSummaryJob<C> {
	pub fn new(
		repo: Arc<dyn TelemetryRepository>,
		sender: Arc<ReliableSender<C>>,
		recipients: RecipientSet,
	) -> Self {
		Self {
			repo,
			sender,
			recipients,
		}
	}

	async fn collect(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RainfallRow>> {
		let mut rows = Vec::new();
		for station in self.repo.list_stations().await? {
			let total = self
				.repo
				.rainfall_between(station.id, from, to)
				.await?
				.unwrap_or(0.0);
			rows.push(RainfallRow {
				station_name: station.name,
				total_mm: total,
			});
		}
		Ok(rows)
	}
}

/// Yesterday 08:00 to today 08:00, local time.
fn rain_window(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
	let cut = NaiveTime::from_hms_opt(RAIN_WINDOW_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
	let to = today.and_time(cut);
	let from = to - chrono::Duration::days(1);
	(from, to)
}

#[async_trait]
impl<C: MessageChannel + 'static> RecurringJob for RainSummaryJob<C> {
	fn name(&self) -> &str {
		"rain-summary"
	}

	async fn run(&self) -> std::result::Result<(), JobError> {
		let today = Local::now().date_naive();
		let (from, to) = rain_window(today);
		let rows = self.collect(from, to).await?;
		info!(station_count = rows.len(), "sending rainfall digest");
		let text = compose_rain_summary(&rows, from.date(), to.date());
		self.sender
			.deliver(&self.recipients, &OutboundMessage::text(text))
			.await;
		Ok(())
	}
}

/// Which day of the remote forecast a digest send covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestSlot {
	/// Morning send: today's forecast.
	Morning,
	/// Evening send: tomorrow's forecast.
	Evening,
}

impl DigestSlot {
	fn day_index(&self) -> usize {
		match self {
			Self::Morning => 0,
			Self::Evening => 1,
		}
	}

	fn label(&self) -> &'static str {
		match self {
			Self::Morning => "today",
			Self::Evening => "tomorrow",
		}
	}
}

#[derive(Debug, Deserialize)]
struct CityForecastResponse {
	list: Vec<CityForecastDay>,
}

#[derive(Debug, Deserialize)]
struct CityForecastDay {
	temp: TempRange,
	humidity: f64,
	#[serde(default)]
	speed: Option<f64>,
	#[serde(default)]
	weather: Vec<WeatherDescription>,
}

#[derive(Debug, Deserialize)]
struct TempRange {
	min: f64,
	max: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherDescription {
	description: String,
}

/// City forecast digest from the remote weather API.
pub struct CityForecastJob<C> {
	http: reqwest::Client,
	api_key: String,
	city: String,
	slot: DigestSlot,
	sender: Arc<ReliableSender<C>>,
	recipients: RecipientSet,
}

impl<C: MessageChannel + 'static> CityForecastJob<C> {
	pub fn new(
		api_key: String,
		city: String,
		slot: DigestSlot,
		sender: Arc<ReliableSender<C>>,
		recipients: RecipientSet,
	) -> Self {
		Self {
			http: reqwest::Client::new(),
			api_key,
			city,
			slot,
			sender,
			recipients,
		}
	}

	async fn fetch(&self) -> Result<CityForecastResponse> {
		let response = self
			.http
			.get("https://api.openweathermap.org/data/2.5/forecast/daily")
			.query(&[
				("q", self.city.as_str()),
				("cnt", "2"),
				("units", "metric"),
				("appid", self.api_key.as_str()),
			])
			.send()
			.await?
			.error_for_status()?;
		Ok(response.json().await?)
	}
}

#[async_trait]
impl<C: MessageChannel + 'static> RecurringJob for CityForecastJob<C> {
	fn name(&self) -> &str {
		match self.slot {
			DigestSlot::Morning => "city-forecast-morning",
			DigestSlot::Evening => "city-forecast-evening",
		}
	}

	async fn run(&self) -> std::result::Result<(), JobError> {
		let response = self.fetch().await?;
		let Some(day) = response.list.get(self.slot.day_index()) else {
			return Err(format!("forecast for {} has no day {}", self.city, self.slot.day_index()).into());
		};
		let text = format_city_digest(&self.city, self.slot.label(), day);
		self.sender
			.deliver(&self.recipients, &OutboundMessage::text(text))
			.await;
		Ok(())
	}
}

fn format_city_digest(city: &str, label: &str, day: &CityForecastDay) -> String {
	let description = day
		.weather
		.first()
		.map(|w| w.description.as_str())
		.unwrap_or("no description");
	let wind = day
		.speed
		.map(|s| format!("{s} m/s"))
		.unwrap_or_else(|| "n/a".to_string());
	format!(
		"*Forecast for {city}, {label}*\n\
		 {description}\n\
		 Temperature: {} C to {} C\n\
		 Humidity: {} %\n\
		 Wind: {wind}",
		day.temp.min, day.temp.max, day.humidity,
	)
}
