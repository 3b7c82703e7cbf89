// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Menu query handlers: weather, archives, forecasts, battery, equipment
//! status. Partially specified actions answer with the next picker in the
//! drill-down; fully specified ones answer with data.

use chrono::{Local, NaiveDate, Weekday};
use fieldwatch_core::{
	compose_status, ChatId, FarmId, FaultyDevice, MonitoredDomain, StationId, ZoneId,
};
use fieldwatch_delivery::{MessageChannel, OutboundMessage};
use fieldwatch_menu::CallbackAction;
use fieldwatch_store::{ArchiveDaySummary, ForecastDay, WeatherObservation};

use super::{menus, Handlers};
use crate::error::Result;

/// How many weekly buckets the archive picker offers.
const ARCHIVE_WEEKS: u32 = 4;

impl<C: MessageChannel + 'static> Handlers<C> {
	pub(super) async fn weather(&self, chat: ChatId, farm: Option<FarmId>) -> Result<()> {
		let Some(farm) = farm else {
			return self
				.pick_farm(chat, |farm| CallbackAction::Weather { farm: Some(farm) })
				.await;
		};
		let stations = self.repo.station_ids_for_farm(farm).await?;
		if stations.is_empty() {
			self.reply(chat, OutboundMessage::text("No weather stations for this farm."))
				.await;
			return Ok(());
		}
		let mut text = String::new();
		for station in stations {
			let name = self.station_label(station).await?;
			match self.repo.latest_observation(station).await? {
				Some(obs) => text.push_str(&format_weather(&name, &obs)),
				None => text.push_str(&format!("*{name}*\nNo observations yet.\n\n")),
			}
		}
		self.reply(chat, OutboundMessage::text(text).with_back_to_menu())
			.await;
		Ok(())
	}

	pub(super) async fn archive(
		&self,
		chat: ChatId,
		farm: Option<FarmId>,
		station: Option<StationId>,
		week: Option<NaiveDate>,
	) -> Result<()> {
		let Some(farm) = farm else {
			return self
				.pick_farm(chat, |farm| CallbackAction::Archive {
					farm: Some(farm),
					station: None,
					week: None,
				})
				.await;
		};
		let Some(station) = station else {
			let mut entries = Vec::new();
			for id in self.repo.station_ids_for_farm(farm).await? {
				entries.push((
					self.station_label(id).await?,
					CallbackAction::Archive {
						farm: Some(farm),
						station: Some(id),
						week: None,
					},
				));
			}
			return self.send_picker(chat, "Choose a station:", entries).await;
		};
		let Some(week) = week else {
			let this_week = Local::now().date_naive().week(Weekday::Mon).first_day();
			let entries = (0..ARCHIVE_WEEKS)
				.map(|n| {
					let monday = this_week - chrono::Duration::weeks(n as i64);
					(
						format!("Week of {monday}"),
						CallbackAction::Archive {
							farm: Some(farm),
							station: Some(station),
							week: Some(monday),
						},
					)
				})
				.collect();
			return self.send_picker(chat, "Choose a week:", entries).await;
		};

		let name = self.station_label(station).await?;
		let mut days = Vec::new();
		for offset in 0..7 {
			let day = week + chrono::Duration::days(offset);
			if let Some(summary) = self.repo.archive_day_summary(station, day).await? {
				days.push(summary);
			}
		}
		self.reply(
			chat,
			OutboundMessage::text(format_archive(&name, week, &days)).with_back_to_menu(),
		)
		.await;
		Ok(())
	}

	pub(super) async fn forecast(
		&self,
		chat: ChatId,
		farm: Option<FarmId>,
		zone: Option<ZoneId>,
		date: Option<NaiveDate>,
	) -> Result<()> {
		let Some(farm) = farm else {
			return self
				.pick_farm(chat, |farm| CallbackAction::Forecast {
					farm: Some(farm),
					zone: None,
					date: None,
				})
				.await;
		};
		let Some(zone) = zone else {
			let entries = self
				.repo
				.zones_for_farm(farm)
				.await?
				.into_iter()
				.map(|z| {
					(
						z.name,
						CallbackAction::Forecast {
							farm: Some(farm),
							zone: Some(z.id),
							date: None,
						},
					)
				})
				.collect();
			return self.send_picker(chat, "Choose a zone:", entries).await;
		};
		let Some(date) = date else {
			let entries = self
				.repo
				.forecast_dates(zone)
				.await?
				.into_iter()
				.map(|day| {
					(
						day.to_string(),
						CallbackAction::Forecast {
							farm: Some(farm),
							zone: Some(zone),
							date: Some(day),
						},
					)
				})
				.collect();
			return self.send_picker(chat, "Choose a date:", entries).await;
		};

		let zone_name = self
			.repo
			.zone_name(zone)
			.await?
			.unwrap_or_else(|| format!("Zone {zone}"));
		match self.repo.forecast_for_date(zone, date).await? {
			Some(day) => {
				self.reply(
					chat,
					OutboundMessage::text(format_forecast(&zone_name, &day)).with_back_to_menu(),
				)
				.await;
			}
			None => {
				self.reply(
					chat,
					OutboundMessage::text(format!("No forecast for {zone_name} on {date}.")),
				)
				.await;
			}
		}
		Ok(())
	}

	pub(super) async fn battery(&self, chat: ChatId, farm: Option<FarmId>) -> Result<()> {
		let Some(farm) = farm else {
			return self
				.pick_farm(chat, |farm| CallbackAction::Battery { farm: Some(farm) })
				.await;
		};
		let mut rows = Vec::new();
		for station in self.repo.station_ids_for_farm(farm).await? {
			let name = self.station_label(station).await?;
			let voltage = self
				.repo
				.latest_observation(station)
				.await?
				.and_then(|obs| obs.battery_voltage);
			rows.push((name, voltage));
		}
		self.reply(
			chat,
			OutboundMessage::text(format_battery(&rows)).with_back_to_menu(),
		)
		.await;
		Ok(())
	}

	pub(super) async fn camera_status(&self, chat: ChatId) -> Result<()> {
		if !self
			.role_of(chat)
			.await?
			.is_some_and(|role| role.can_view_cameras())
		{
			self.reply(chat, OutboundMessage::text("Camera status is not available for your role."))
				.await;
			return Ok(());
		}
		let cameras = self.repo.list_cameras().await?;
		let mut faults = Vec::new();
		for cam in cameras {
			if !self.prober.is_reachable(&cam.addr).await {
				faults.push(FaultyDevice::new(cam.id.0, cam.name, cam.addr));
			}
		}
		self.reply(
			chat,
			OutboundMessage::text(compose_status(MonitoredDomain::Cameras, &faults))
				.with_back_to_menu(),
		)
		.await;
		Ok(())
	}

	pub(super) async fn station_status(&self, chat: ChatId) -> Result<()> {
		if self.role_of(chat).await? != Some(fieldwatch_core::Role::Programmer) {
			self.reply(chat, OutboundMessage::text("Station status is not available for your role."))
				.await;
			return Ok(());
		}
		let stations = self.repo.list_stations().await?;
		let mut faults = Vec::new();
		for station in stations {
			if !self.prober.is_reachable(&station.addr).await {
				faults.push(FaultyDevice::new(station.id.0, station.name, station.addr));
			}
		}
		self.reply(
			chat,
			OutboundMessage::text(compose_status(MonitoredDomain::WeatherStations, &faults))
				.with_back_to_menu(),
		)
		.await;
		Ok(())
	}

	async fn pick_farm(
		&self,
		chat: ChatId,
		action: impl Fn(FarmId) -> CallbackAction,
	) -> Result<()> {
		let keyboard = menus::farm_picker(&self.config.farms, action);
		if keyboard.is_empty() {
			self.reply(chat, OutboundMessage::text("No farms are configured."))
				.await;
			return Ok(());
		}
		self.reply(chat, OutboundMessage::text_with_keyboard("Choose a farm:", keyboard))
			.await;
		Ok(())
	}

	async fn send_picker(
		&self,
		chat: ChatId,
		prompt: &str,
		entries: Vec<(String, CallbackAction)>,
	) -> Result<()> {
		if entries.is_empty() {
			self.reply(chat, OutboundMessage::text("Nothing to choose from."))
				.await;
			return Ok(());
		}
		self.reply(
			chat,
			OutboundMessage::text_with_keyboard(prompt, menus::picker(entries)),
		)
		.await;
		Ok(())
	}

	async fn station_label(&self, station: StationId) -> Result<String> {
		Ok(self
			.repo
			.station_name(station)
			.await?
			.unwrap_or_else(|| format!("Station {station}")))
	}
}

fn fmt_reading(value: Option<f64>, unit: &str) -> String {
	match value {
		Some(v) => format!("{v} {unit}"),
		None => "n/a".to_string(),
	}
}

fn format_weather(name: &str, obs: &WeatherObservation) -> String {
	let wind_dir = obs.wind_direction.as_deref().unwrap_or("n/a");
	format!(
		"*{name}*\n\
		 Time: {}\n\
		 Temperature: {}\n\
		 Humidity: {}\n\
		 Pressure: {}\n\
		 Rain: {}\n\
		 Wind: {} (gusts {}), {}\n\n",
		obs.taken_at.format("%Y-%m-%d %H:%M"),
		fmt_reading(obs.temperature, "C"),
		fmt_reading(obs.humidity, "%"),
		fmt_reading(obs.barometer, "mm"),
		fmt_reading(obs.rain, "mm"),
		fmt_reading(obs.wind_speed, "m/s"),
		fmt_reading(obs.wind_gust, "m/s"),
		wind_dir,
	)
}

fn format_archive(name: &str, week: NaiveDate, days: &[ArchiveDaySummary]) -> String {
	if days.is_empty() {
		return format!("*{name}*\nNo archive data for the week of {week}.");
	}
	let mut text = format!("*{name}*, week of {week}:\n");
	for day in days {
		text.push_str(&format!(
			"\n{}: max {}, min {}, avg {}, rain {}",
			day.day,
			fmt_reading(day.max_temp, "C"),
			fmt_reading(day.min_temp, "C"),
			fmt_reading(day.avg_temp, "C"),
			fmt_reading(day.rain_sum, "mm"),
		));
	}
	text
}

fn format_forecast(zone_name: &str, day: &ForecastDay) -> String {
	format!(
		"*{zone_name}*, {}\n\
		 {}\n\
		 Temperature: {} C to {} C\n\
		 Precipitation: {} mm/h (peaks {} mm/h)\n\
		 Humidity: {}\n\
		 Pressure: {} hPa\n\
		 Dew point: {} C",
		day.day.format("%Y-%m-%d"),
		day.summary,
		day.temp_min,
		day.temp_max,
		day.precip_intensity,
		day.precip_intensity_max,
		day.humidity,
		day.pressure,
		day.dew_point,
	)
}

fn format_battery(rows: &[(String, Option<f64>)]) -> String {
	if rows.is_empty() {
		return "No weather stations for this farm.".to_string();
	}
	let mut text = "*Station battery voltage*\n".to_string();
	for (name, voltage) in rows {
		text.push_str(&format!("\n{name}: {}", fmt_reading(*voltage, "V")));
	}
	text
}
