// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository layer for fieldwatch database lookups.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use tracing::instrument;

use fieldwatch_core::{CameraId, ChatId, FarmId, Role, StationId, ZoneId};

use crate::error::{Result, StoreError};
use crate::rows::{
	ArchiveDaySummary, CameraRow, ForecastDay, NewUser, StationRow, UserRecord,
	WeatherObservation, ZoneRow,
};

/// Lookup surface shared by the command handlers and the monitor loops.
///
/// Every method is a possibly-failing query returning structured rows or a
/// not-found signal; callers treat a failure as "cannot evaluate this
/// cycle", never as an incident.
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
	// User operations
	async fn find_user(&self, chat: ChatId) -> Result<Option<UserRecord>>;
	async fn register_user(&self, user: &NewUser) -> Result<()>;
	async fn registration_confirmed(&self, chat: ChatId) -> Result<bool>;
	async fn confirm_registration(&self, chat: ChatId) -> Result<()>;
	async fn remove_user(&self, chat: ChatId) -> Result<()>;
	async fn role_of(&self, chat: ChatId) -> Result<Option<Role>>;
	async fn list_users(&self) -> Result<Vec<UserRecord>>;

	// Station operations
	async fn station_ids_for_farm(&self, farm: FarmId) -> Result<Vec<StationId>>;
	async fn station_name(&self, station: StationId) -> Result<Option<String>>;
	async fn list_stations(&self) -> Result<Vec<StationRow>>;
	async fn latest_observation(&self, station: StationId) -> Result<Option<WeatherObservation>>;
	async fn archive_day_summary(
		&self,
		station: StationId,
		day: NaiveDate,
	) -> Result<Option<ArchiveDaySummary>>;
	async fn rainfall_between(
		&self,
		station: StationId,
		from: NaiveDateTime,
		to: NaiveDateTime,
	) -> Result<Option<f64>>;

	// Forecast operations
	async fn zones_for_farm(&self, farm: FarmId) -> Result<Vec<ZoneRow>>;
	async fn zone_name(&self, zone: ZoneId) -> Result<Option<String>>;
	async fn forecast_dates(&self, zone: ZoneId) -> Result<Vec<NaiveDate>>;
	async fn forecast_for_date(&self, zone: ZoneId, day: NaiveDate) -> Result<Option<ForecastDay>>;

	// Equipment operations
	async fn list_cameras(&self) -> Result<Vec<CameraRow>>;

	// Imagery operations
	async fn max_imagery_id(&self, farm: FarmId) -> Result<Option<i64>>;
}

/// Postgres implementation of the telemetry repository.
#[derive(Clone)]
pub struct PgTelemetryRepository {
	pool: PgPool,
}

impl PgTelemetryRepository {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[derive(sqlx::FromRow)]
struct UserRow {
	telegram_id: i64,
	name: Option<String>,
	surname: Option<String>,
	regisdate: NaiveDateTime,
	regcheck: bool,
	role: i32,
}

impl From<UserRow> for UserRecord {
	fn from(row: UserRow) -> Self {
		Self {
			chat_id: ChatId(row.telegram_id),
			name: row.name,
			surname: row.surname,
			registered_at: row.regisdate,
			confirmed: row.regcheck,
			role_code: row.role,
		}
	}
}

#[derive(sqlx::FromRow)]
struct ObservationRow {
	datetime: NaiveDateTime,
	weatherstationid: i32,
	temperature: Option<f64>,
	humidity: Option<f64>,
	barometer: Option<f64>,
	rain: Option<f64>,
	windspeed: Option<f64>,
	windgust: Option<f64>,
	winddegrees: Option<f64>,
	winddirection: Option<String>,
	consbatteryvoltage: Option<f64>,
}

impl From<ObservationRow> for WeatherObservation {
	fn from(row: ObservationRow) -> Self {
		Self {
			taken_at: row.datetime,
			station: StationId(row.weatherstationid),
			temperature: row.temperature,
			humidity: row.humidity,
			barometer: row.barometer,
			rain: row.rain,
			wind_speed: row.windspeed,
			wind_gust: row.windgust,
			wind_degrees: row.winddegrees,
			wind_direction: row.winddirection,
			battery_voltage: row.consbatteryvoltage,
		}
	}
}

#[derive(sqlx::FromRow)]
struct ForecastRow {
	time: NaiveDateTime,
	summary: String,
	precipintensity: f64,
	precipintensitymax: f64,
	dewpoint: f64,
	humidity: f64,
	pressure: f64,
	temperaturemin: f64,
	temperaturemax: f64,
	temperaturemintime: NaiveDateTime,
	temperaturemaxtime: NaiveDateTime,
}

impl From<ForecastRow> for ForecastDay {
	fn from(row: ForecastRow) -> Self {
		Self {
			day: row.time,
			summary: row.summary,
			precip_intensity: row.precipintensity,
			precip_intensity_max: row.precipintensitymax,
			dew_point: row.dewpoint,
			humidity: row.humidity,
			pressure: row.pressure,
			temp_min: row.temperaturemin,
			temp_max: row.temperaturemax,
			temp_min_at: row.temperaturemintime,
			temp_max_at: row.temperaturemaxtime,
		}
	}
}

#[async_trait]
impl TelemetryRepository for PgTelemetryRepository {
	#[instrument(skip(self), fields(chat = %chat))]
	async fn find_user(&self, chat: ChatId) -> Result<Option<UserRecord>> {
		let row = sqlx::query_as::<_, UserRow>(
			r#"
			SELECT telegram_id, name, surname, regisdate, regcheck, role
			FROM public."TelegramBot"
			WHERE telegram_id = $1
			"#,
		)
		.bind(chat.0)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(UserRecord::from))
	}

	#[instrument(skip(self, user), fields(chat = %user.chat_id))]
	async fn register_user(&self, user: &NewUser) -> Result<()> {
		sqlx::query(
			r#"
			INSERT INTO public."TelegramBot" (name, surname, regisdate, telegram_id, regcheck, role)
			VALUES ($1, $2, $3, $4, FALSE, $5)
			"#,
		)
		.bind(&user.name)
		.bind(&user.surname)
		.bind(user.registered_at)
		.bind(user.chat_id.0)
		.bind(user.role_code)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[instrument(skip(self), fields(chat = %chat))]
	async fn registration_confirmed(&self, chat: ChatId) -> Result<bool> {
		let confirmed: Option<(bool,)> =
			sqlx::query_as(r#"SELECT regcheck FROM public."TelegramBot" WHERE telegram_id = $1"#)
				.bind(chat.0)
				.fetch_optional(&self.pool)
				.await?;

		Ok(confirmed.map(|(c,)| c).unwrap_or(false))
	}

	#[instrument(skip(self), fields(chat = %chat))]
	async fn confirm_registration(&self, chat: ChatId) -> Result<()> {
		sqlx::query(r#"UPDATE public."TelegramBot" SET regcheck = TRUE WHERE telegram_id = $1"#)
			.bind(chat.0)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	#[instrument(skip(self), fields(chat = %chat))]
	async fn remove_user(&self, chat: ChatId) -> Result<()> {
		sqlx::query(r#"DELETE FROM public."TelegramBot" WHERE telegram_id = $1"#)
			.bind(chat.0)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	#[instrument(skip(self), fields(chat = %chat))]
	async fn role_of(&self, chat: ChatId) -> Result<Option<Role>> {
		let code: Option<(i32,)> =
			sqlx::query_as(r#"SELECT role FROM public."TelegramBot" WHERE telegram_id = $1"#)
				.bind(chat.0)
				.fetch_optional(&self.pool)
				.await?;

		match code {
			None => Ok(None),
			Some((code,)) => Role::from_code(code)
				.map(Some)
				.ok_or(StoreError::InvalidRole(code)),
		}
	}

	#[instrument(skip(self))]
	async fn list_users(&self) -> Result<Vec<UserRecord>> {
		let rows = sqlx::query_as::<_, UserRow>(
			r#"
			SELECT telegram_id, name, surname, regisdate, regcheck, role
			FROM public."TelegramBot"
			ORDER BY regisdate
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows.into_iter().map(UserRecord::from).collect())
	}

	#[instrument(skip(self), fields(farm = %farm))]
	async fn station_ids_for_farm(&self, farm: FarmId) -> Result<Vec<StationId>> {
		let ids: Vec<(i32,)> =
			sqlx::query_as(r#"SELECT weathergroupid FROM public."WeatherGroupAgro" WHERE agroid = $1"#)
				.bind(farm.0)
				.fetch_all(&self.pool)
				.await?;

		Ok(ids.into_iter().map(|(id,)| StationId(id)).collect())
	}

	#[instrument(skip(self), fields(station = %station))]
	async fn station_name(&self, station: StationId) -> Result<Option<String>> {
		let name: Option<(String,)> =
			sqlx::query_as(r#"SELECT shortname FROM public."WeatherGroup" WHERE id = $1"#)
				.bind(station.0)
				.fetch_optional(&self.pool)
				.await?;

		Ok(name.map(|(n,)| n))
	}

	#[instrument(skip(self))]
	async fn list_stations(&self) -> Result<Vec<StationRow>> {
		let rows: Vec<(i32, String, String)> =
			sqlx::query_as(r#"SELECT id, shortname, ip FROM public."WeatherStation" ORDER BY id"#)
				.fetch_all(&self.pool)
				.await?;

		Ok(rows
			.into_iter()
			.map(|(id, name, addr)| StationRow {
				id: StationId(id),
				name,
				addr,
			})
			.collect())
	}

	#[instrument(skip(self), fields(station = %station))]
	async fn latest_observation(&self, station: StationId) -> Result<Option<WeatherObservation>> {
		let row = sqlx::query_as::<_, ObservationRow>(
			r#"
			SELECT datetime, weatherstationid, temperature, humidity, barometer, rain,
				   windspeed, windgust, winddegrees, winddirection, consbatteryvoltage
			FROM public."WeatherData"
			WHERE weatherstationid = $1
			ORDER BY id DESC
			LIMIT 1
			"#,
		)
		.bind(station.0)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(WeatherObservation::from))
	}

	#[instrument(skip(self), fields(station = %station, day = %day))]
	async fn archive_day_summary(
		&self,
		station: StationId,
		day: NaiveDate,
	) -> Result<Option<ArchiveDaySummary>> {
		let from = day.and_hms_opt(0, 0, 0).expect("midnight is valid");
		let to = day.and_hms_opt(23, 30, 0).expect("23:30 is valid");

		let row: Option<(Option<f64>, Option<f64>, Option<f64>, Option<f64>)> = sqlx::query_as(
			r#"
			SELECT MAX(temperature), MIN(temperature), AVG(temperature), SUM(rain)
			FROM public."WeatherData"
			WHERE weatherstationid = $1 AND datetime BETWEEN $2 AND $3
			"#,
		)
		.bind(station.0)
		.bind(from)
		.bind(to)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(|(max_temp, min_temp, avg_temp, rain_sum)| ArchiveDaySummary {
			day,
			max_temp,
			min_temp,
			avg_temp,
			rain_sum,
		}))
	}

	#[instrument(skip(self), fields(station = %station))]
	async fn rainfall_between(
		&self,
		station: StationId,
		from: NaiveDateTime,
		to: NaiveDateTime,
	) -> Result<Option<f64>> {
		let sum: Option<(Option<f64>,)> = sqlx::query_as(
			r#"
			SELECT SUM(rain)
			FROM public."WeatherData"
			WHERE datetime BETWEEN $1 AND $2 AND weatherstationid = $3
			"#,
		)
		.bind(from)
		.bind(to)
		.bind(station.0)
		.fetch_optional(&self.pool)
		.await?;

		Ok(sum.and_then(|(s,)| s))
	}

	#[instrument(skip(self), fields(farm = %farm))]
	async fn zones_for_farm(&self, farm: FarmId) -> Result<Vec<ZoneRow>> {
		let rows: Vec<(i32, String)> =
			sqlx::query_as(r#"SELECT id, forecastareaname FROM public."ForecastZoneArea" WHERE agroid = $1"#)
				.bind(farm.0)
				.fetch_all(&self.pool)
				.await?;

		Ok(rows
			.into_iter()
			.map(|(id, name)| ZoneRow {
				id: ZoneId(id),
				name,
			})
			.collect())
	}

	#[instrument(skip(self), fields(zone = %zone))]
	async fn zone_name(&self, zone: ZoneId) -> Result<Option<String>> {
		let name: Option<(String,)> =
			sqlx::query_as(r#"SELECT forecastareaname FROM public."ForecastZoneArea" WHERE id = $1"#)
				.bind(zone.0)
				.fetch_optional(&self.pool)
				.await?;

		Ok(name.map(|(n,)| n))
	}

	#[instrument(skip(self), fields(zone = %zone))]
	async fn forecast_dates(&self, zone: ZoneId) -> Result<Vec<NaiveDate>> {
		let dates: Vec<(NaiveDateTime,)> =
			sqlx::query_as(r#"SELECT "time" FROM public."ForecastDaily" WHERE forecastzoneid = $1 ORDER BY "time""#)
				.bind(zone.0)
				.fetch_all(&self.pool)
				.await?;

		Ok(dates.into_iter().map(|(dt,)| dt.date()).collect())
	}

	#[instrument(skip(self), fields(zone = %zone, day = %day))]
	async fn forecast_for_date(&self, zone: ZoneId, day: NaiveDate) -> Result<Option<ForecastDay>> {
		let row = sqlx::query_as::<_, ForecastRow>(
			r#"
			SELECT "time", summary, precipintensity, precipintensitymax, dewpoint, humidity,
				   pressure, temperaturemin, temperaturemax, temperaturemintime, temperaturemaxtime
			FROM public."ForecastDaily"
			WHERE forecastzoneid = $1 AND "time"::date = $2
			"#,
		)
		.bind(zone.0)
		.bind(day)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(ForecastDay::from))
	}

	#[instrument(skip(self))]
	async fn list_cameras(&self) -> Result<Vec<CameraRow>> {
		let rows: Vec<(i32, i32, String, String, Option<f64>, Option<f64>)> = sqlx::query_as(
			r#"SELECT id, agroid, name, ip, lat, lon FROM public."SecurityCam" ORDER BY id"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows
			.into_iter()
			.map(|(id, farm, name, addr, lat, lon)| CameraRow {
				id: CameraId(id),
				farm: FarmId(farm),
				name,
				addr,
				lat,
				lon,
			})
			.collect())
	}

	#[instrument(skip(self), fields(farm = %farm))]
	async fn max_imagery_id(&self, farm: FarmId) -> Result<Option<i64>> {
		let max: Option<(Option<i64>,)> = sqlx::query_as(
			r#"SELECT MAX(id) FROM public."Layer" WHERE agroid = $1 AND "set" = 'visual'"#,
		)
		.bind(farm.0)
		.fetch_optional(&self.pool)
		.await?;

		Ok(max.and_then(|(id,)| id))
	}
}
