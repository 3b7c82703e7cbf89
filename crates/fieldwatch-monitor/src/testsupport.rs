// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory repository and prober doubles shared by the check tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use fieldwatch_core::{CameraId, ChatId, FarmId, Role, StationId, ZoneId};
use fieldwatch_store::{
	ArchiveDaySummary, CameraRow, ForecastDay, NewUser, Prober, Result, StationRow,
	TelemetryRepository, UserRecord, WeatherObservation, ZoneRow,
};

pub(crate) struct FakeRepository {
	cameras: Vec<CameraRow>,
	stations: Vec<StationRow>,
	observations: HashMap<i32, WeatherObservation>,
	imagery: Mutex<HashMap<i32, i64>>,
}

impl FakeRepository {
	pub(crate) fn new() -> Self {
		Self {
			cameras: Vec::new(),
			stations: Vec::new(),
			observations: HashMap::new(),
			imagery: Mutex::new(HashMap::new()),
		}
	}

	pub(crate) fn with_cameras(mut self, cameras: Vec<CameraRow>) -> Self {
		self.cameras = cameras;
		self
	}

	pub(crate) fn with_stations(mut self, stations: Vec<StationRow>) -> Self {
		self.stations = stations;
		self
	}

	/// Attach a complete observation for a station, then let the caller
	/// knock fields out.
	pub(crate) fn with_observation(
		mut self,
		station: i32,
		mutate: impl FnOnce(&mut WeatherObservation),
	) -> Self {
		let mut obs = complete_observation(station);
		mutate(&mut obs);
		self.observations.insert(station, obs);
		self
	}

	pub(crate) fn with_imagery(self, farm: i32, max_id: i64) -> Self {
		self.imagery.lock().unwrap().insert(farm, max_id);
		self
	}

	pub(crate) fn set_imagery(&self, farm: i32, max_id: i64) {
		self.imagery.lock().unwrap().insert(farm, max_id);
	}
}

fn complete_observation(station: i32) -> WeatherObservation {
	WeatherObservation {
		taken_at: NaiveDate::from_ymd_opt(2024, 7, 3)
			.unwrap()
			.and_hms_opt(12, 0, 0)
			.unwrap(),
		station: StationId(station),
		temperature: Some(24.5),
		humidity: Some(40.0),
		barometer: Some(752.0),
		rain: Some(0.0),
		wind_speed: Some(3.2),
		wind_gust: Some(5.1),
		wind_degrees: Some(180.0),
		wind_direction: Some("S".to_string()),
		battery_voltage: Some(12.7),
	}
}

#[async_trait]
impl TelemetryRepository for FakeRepository {
	async fn find_user(&self, _chat: ChatId) -> Result<Option<UserRecord>> {
		Ok(None)
	}

	async fn register_user(&self, _user: &NewUser) -> Result<()> {
		Ok(())
	}

	async fn registration_confirmed(&self, _chat: ChatId) -> Result<bool> {
		Ok(false)
	}

	async fn confirm_registration(&self, _chat: ChatId) -> Result<()> {
		Ok(())
	}

	async fn remove_user(&self, _chat: ChatId) -> Result<()> {
		Ok(())
	}

	async fn role_of(&self, _chat: ChatId) -> Result<Option<Role>> {
		Ok(None)
	}

	async fn list_users(&self) -> Result<Vec<UserRecord>> {
		Ok(Vec::new())
	}

	async fn station_ids_for_farm(&self, _farm: FarmId) -> Result<Vec<StationId>> {
		Ok(self.stations.iter().map(|s| s.id).collect())
	}

	async fn station_name(&self, station: StationId) -> Result<Option<String>> {
		Ok(self
			.stations
			.iter()
			.find(|s| s.id == station)
			.map(|s| s.name.clone()))
	}

	async fn list_stations(&self) -> Result<Vec<StationRow>> {
		Ok(self.stations.clone())
	}

	async fn latest_observation(&self, station: StationId) -> Result<Option<WeatherObservation>> {
		Ok(self.observations.get(&station.0).cloned())
	}

	async fn archive_day_summary(
		&self,
		_station: StationId,
		_day: NaiveDate,
	) -> Result<Option<ArchiveDaySummary>> {
		Ok(None)
	}

	async fn rainfall_between(
		&self,
		_station: StationId,
		_from: NaiveDateTime,
		_to: NaiveDateTime,
	) -> Result<Option<f64>> {
		Ok(None)
	}

	async fn zones_for_farm(&self, _farm: FarmId) -> Result<Vec<ZoneRow>> {
		Ok(Vec::new())
	}

	async fn zone_name(&self, _zone: ZoneId) -> Result<Option<String>> {
		Ok(None)
	}

	async fn forecast_dates(&self, _zone: ZoneId) -> Result<Vec<NaiveDate>> {
		Ok(Vec::new())
	}

	async fn forecast_for_date(
		&self,
		_zone: ZoneId,
		_day: NaiveDate,
	) -> Result<Option<ForecastDay>> {
		Ok(None)
	}

	async fn list_cameras(&self) -> Result<Vec<CameraRow>> {
		Ok(self.cameras.clone())
	}

	async fn max_imagery_id(&self, farm: FarmId) -> Result<Option<i64>> {
		Ok(self.imagery.lock().unwrap().get(&farm.0).copied())
	}
}

pub(crate) struct FakeProber {
	reachable: Vec<String>,
}

impl FakeProber {
	pub(crate) fn reachable_only(addrs: Vec<&str>) -> Self {
		Self {
			reachable: addrs.into_iter().map(String::from).collect(),
		}
	}
}

#[async_trait]
impl Prober for FakeProber {
	async fn is_reachable(&self, addr: &str) -> bool {
		self.reachable.iter().any(|a| a == addr)
	}
}
