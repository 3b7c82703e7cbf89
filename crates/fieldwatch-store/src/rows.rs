// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Row types returned by repository lookups.

use chrono::{NaiveDate, NaiveDateTime};
use fieldwatch_core::{CameraId, ChatId, FarmId, StationId, ZoneId};

/// A registered (or pending) bot user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
	pub chat_id: ChatId,
	pub name: Option<String>,
	pub surname: Option<String>,
	pub registered_at: NaiveDateTime,
	pub confirmed: bool,
	pub role_code: i32,
}

/// A registration request for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub chat_id: ChatId,
	pub name: Option<String>,
	pub surname: Option<String>,
	pub registered_at: NaiveDateTime,
	pub role_code: i32,
}

/// A weather station with its probe address.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
	pub id: StationId,
	pub name: String,
	pub addr: String,
}

/// A surveillance camera with its probe address and coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRow {
	pub id: CameraId,
	pub farm: FarmId,
	pub name: String,
	pub addr: String,
	pub lat: Option<f64>,
	pub lon: Option<f64>,
}

/// The latest observation reported by a weather station.
///
/// Every sensor field is optional; a `None` means the station logged the
/// row without that reading, which is exactly what the null-readings check
/// looks for.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
	pub taken_at: NaiveDateTime,
	pub station: StationId,
	pub temperature: Option<f64>,
	pub humidity: Option<f64>,
	pub barometer: Option<f64>,
	pub rain: Option<f64>,
	pub wind_speed: Option<f64>,
	pub wind_gust: Option<f64>,
	pub wind_degrees: Option<f64>,
	pub wind_direction: Option<String>,
	pub battery_voltage: Option<f64>,
}

impl WeatherObservation {
	/// Names of the sensor fields that are missing from this observation.
	pub fn null_fields(&self) -> Vec<String> {
		let mut missing = Vec::new();
		let fields: [(&str, bool); 7] = [
			("Temperature", self.temperature.is_none()),
			("Humidity", self.humidity.is_none()),
			("Barometer", self.barometer.is_none()),
			("Rain", self.rain.is_none()),
			("Wind speed", self.wind_speed.is_none()),
			("Wind gust", self.wind_gust.is_none()),
			("Wind direction", self.wind_degrees.is_none()),
		];
		for (name, is_null) in fields {
			if is_null {
				missing.push(name.to_string());
			}
		}
		missing
	}
}

/// Daily aggregate for the weather archive menu.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveDaySummary {
	pub day: NaiveDate,
	pub max_temp: Option<f64>,
	pub min_temp: Option<f64>,
	pub avg_temp: Option<f64>,
	pub rain_sum: Option<f64>,
}

/// A forecast micro-zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRow {
	pub id: ZoneId,
	pub name: String,
}

/// One day's forecast for a micro-zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
	pub day: NaiveDateTime,
	pub summary: String,
	pub precip_intensity: f64,
	pub precip_intensity_max: f64,
	pub dew_point: f64,
	pub humidity: f64,
	pub pressure: f64,
	pub temp_min: f64,
	pub temp_max: f64,
	pub temp_min_at: NaiveDateTime,
	pub temp_max_at: NaiveDateTime,
}
