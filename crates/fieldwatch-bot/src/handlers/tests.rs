// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use fieldwatch_core::{CameraId, ChatId, FarmId, Role, StationId, ZoneId};
use fieldwatch_delivery::{Payload, ReliableSender};
use fieldwatch_store::{
	ArchiveDaySummary, CameraRow, ForecastDay, NewUser, Prober, StationRow, StoreError,
	TelemetryRepository, UserRecord, WeatherObservation, ZoneRow,
};

use super::{Handlers, StoreMenuGate, FALLBACK, UNAVAILABLE};
use crate::config::BotConfig;

type StoreResult<T> = fieldwatch_store::Result<T>;

struct FakeRepo {
	users: Mutex<HashMap<i64, UserRecord>>,
	stations: Vec<StationRow>,
	observations: HashMap<i32, WeatherObservation>,
	fail_all: AtomicBool,
}

impl FakeRepo {
	fn new() -> Self {
		Self {
			users: Mutex::new(HashMap::new()),
			stations: Vec::new(),
			observations: HashMap::new(),
			fail_all: AtomicBool::new(false),
		}
	}

	fn with_user(self, chat: i64, role: Role, confirmed: bool) -> Self {
		self.users.lock().unwrap().insert(
			chat,
			UserRecord {
				chat_id: ChatId(chat),
				name: Some("Ann".to_string()),
				surname: None,
				registered_at: noon(),
				confirmed,
				role_code: role.code(),
			},
		);
		self
	}

	fn fail_everything(&self) {
		self.fail_all.store(true, Ordering::SeqCst);
	}

	fn check(&self) -> StoreResult<()> {
		if self.fail_all.load(Ordering::SeqCst) {
			Err(StoreError::Database(sqlx::Error::PoolClosed))
		} else {
			Ok(())
		}
	}
}

fn noon() -> NaiveDateTime {
	NaiveDate::from_ymd_opt(2024, 7, 3)
		.unwrap()
		.and_hms_opt(12, 0, 0)
		.unwrap()
}

#[async_trait]
impl TelemetryRepository for FakeRepo {
	async fn find_user(&self, chat: ChatId) -> StoreResult<Option<UserRecord>> {
		self.check()?;
		Ok(self.users.lock().unwrap().get(&chat.0).cloned())
	}

	async fn register_user(&self, user: &NewUser) -> StoreResult<()> {
		self.check()?;
		self.users.lock().unwrap().insert(
			user.chat_id.0,
			UserRecord {
				chat_id: user.chat_id,
				name: user.name.clone(),
				surname: user.surname.clone(),
				registered_at: user.registered_at,
				confirmed: false,
				role_code: user.role_code,
			},
		);
		Ok(())
	}

	async fn registration_confirmed(&self, chat: ChatId) -> StoreResult<bool> {
		self.check()?;
		Ok(self
			.users
			.lock()
			.unwrap()
			.get(&chat.0)
			.is_some_and(|u| u.confirmed))
	}

	async fn confirm_registration(&self, chat: ChatId) -> StoreResult<()> {
		self.check()?;
		if let Some(user) = self.users.lock().unwrap().get_mut(&chat.0) {
			user.confirmed = true;
		}
		Ok(())
	}

	async fn remove_user(&self, chat: ChatId) -> StoreResult<()> {
		self.check()?;
		self.users.lock().unwrap().remove(&chat.0);
		Ok(())
	}

	async fn role_of(&self, chat: ChatId) -> StoreResult<Option<Role>> {
		self.check()?;
		Ok(self
			.users
			.lock()
			.unwrap()
			.get(&chat.0)
			.and_then(|u| Role::from_code(u.role_code)))
	}

	async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
		self.check()?;
		Ok(self.users.lock().unwrap().values().cloned().collect())
	}

	async fn station_ids_for_farm(&self, _farm: FarmId) -> StoreResult<Vec<StationId>> {
		self.check()?;
		Ok(self.stations.iter().map(|s| s.id).collect())
	}

	async fn station_name(&self, station: StationId) -> StoreResult<Option<String>> {
		self.check()?;
		Ok(self
			.stations
			.iter()
			.find(|s| s.id == station)
			.map(|s| s.name.clone()))
	}

	async fn list_stations(&self) -> StoreResult<Vec<StationRow>> {
		self.check()?;
		Ok(self.stations.clone())
	}

	async fn latest_observation(&self, station: StationId) -> StoreResult<Option<WeatherObservation>> {
		self.check()?;
		Ok(self.observations.get(&station.0).cloned())
	}

	async fn archive_day_summary(
		&self,
		_station: StationId,
		_day: NaiveDate,
	) -> StoreResult<Option<ArchiveDaySummary>> {
		self.check()?;
		Ok(None)
	}

	async fn rainfall_between(
		&self,
		_station: StationId,
		_from: NaiveDateTime,
		_to: NaiveDateTime,
	) -> StoreResult<Option<f64>> {
		self.check()?;
		Ok(None)
	}

	async fn zones_for_farm(&self, _farm: FarmId) -> StoreResult<Vec<ZoneRow>> {
		self.check()?;
		Ok(Vec::new())
	}

	async fn zone_name(&self, _zone: ZoneId) -> StoreResult<Option<String>> {
		self.check()?;
		Ok(None)
	}

	async fn forecast_dates(&self, _zone: ZoneId) -> StoreResult<Vec<NaiveDate>> {
		self.check()?;
		Ok(Vec::new())
	}

	async fn forecast_for_date(
		&self,
		_zone: ZoneId,
		_day: NaiveDate,
	) -> StoreResult<Option<ForecastDay>> {
		self.check()?;
		Ok(None)
	}

	async fn list_cameras(&self) -> StoreResult<Vec<CameraRow>> {
		self.check()?;
		Ok(vec![CameraRow {
			id: CameraId(1),
			farm: FarmId(1),
			name: "Gate".to_string(),
			addr: "10.0.0.1".to_string(),
			lat: None,
			lon: None,
		}])
	}

	async fn max_imagery_id(&self, _farm: FarmId) -> StoreResult<Option<i64>> {
		self.check()?;
		Ok(None)
	}
}

struct AlwaysReachable;

#[async_trait]
impl Prober for AlwaysReachable {
	async fn is_reachable(&self, _addr: &str) -> bool {
		true
	}
}

struct RecordingChannel {
	sent: Mutex<Vec<(i64, Payload)>>,
}

impl RecordingChannel {
	fn new() -> Arc<Self> {
		Arc::new(Self {
			sent: Mutex::new(Vec::new()),
		})
	}

	fn texts_for(&self, chat: i64) -> Vec<String> {
		self.sent
			.lock()
			.unwrap()
			.iter()
			.filter(|(c, _)| *c == chat)
			.filter_map(|(_, p)| match p {
				Payload::Text { text, .. } => Some(text.clone()),
				_ => None,
			})
			.collect()
	}

	fn keyboards_for(&self, chat: i64) -> Vec<fieldwatch_delivery::InlineKeyboardMarkup> {
		self.sent
			.lock()
			.unwrap()
			.iter()
			.filter(|(c, _)| *c == chat)
			.filter_map(|(_, p)| match p {
				Payload::Text {
					keyboard: Some(kb), ..
				} => Some(kb.clone()),
				_ => None,
			})
			.collect()
	}
}

#[async_trait]
impl fieldwatch_delivery::MessageChannel for RecordingChannel {
	async fn send(&self, chat: ChatId, payload: &Payload) -> fieldwatch_delivery::Result<()> {
		self.sent.lock().unwrap().push((chat.0, payload.clone()));
		Ok(())
	}
}

fn test_config() -> Arc<BotConfig> {
	Arc::new(
		toml::from_str(
			r#"
farms = [1]

[recipients]
admins = [100]
"#,
		)
		.unwrap(),
	)
}

fn handlers(repo: Arc<FakeRepo>, channel: Arc<RecordingChannel>) -> Handlers<RecordingChannel> {
	let sender = Arc::new(ReliableSender::new(channel));
	Handlers::new(repo, Arc::new(AlwaysReachable), sender, test_config())
}

#[tokio::test]
async fn unregistered_menu_request_is_refused() {
	let repo = Arc::new(FakeRepo::new());
	let channel = RecordingChannel::new();
	let h = handlers(Arc::clone(&repo), Arc::clone(&channel));

	h.handle_text(ChatId(5), "/menu").await;
	let texts = channel.texts_for(5);
	assert_eq!(texts.len(), 1);
	assert!(texts[0].contains("not registered"));
}

#[tokio::test]
async fn confirmed_user_gets_a_role_menu() {
	let repo = Arc::new(FakeRepo::new().with_user(5, Role::View, true));
	let channel = RecordingChannel::new();
	let h = handlers(Arc::clone(&repo), Arc::clone(&channel));

	h.handle_text(ChatId(5), "/menu").await;
	let keyboards = channel.keyboards_for(5);
	assert_eq!(keyboards.len(), 1);
	let labels: Vec<String> = keyboards[0]
		.inline_keyboard
		.iter()
		.flatten()
		.map(|b| b.text.clone())
		.collect();
	assert!(labels.contains(&"Current weather".to_string()));
	assert!(!labels.contains(&"Cameras".to_string()));
}

#[tokio::test]
async fn malformed_callback_gets_the_fallback_reply() {
	let repo = Arc::new(FakeRepo::new().with_user(5, Role::View, true));
	let channel = RecordingChannel::new();
	let h = handlers(repo, Arc::clone(&channel));

	h.handle_callback(ChatId(5), "button:weather,farm:1,farm:2").await;
	assert_eq!(channel.texts_for(5), vec![FALLBACK.to_string()]);
}

#[tokio::test]
async fn weather_without_farm_offers_a_picker() {
	let repo = Arc::new(FakeRepo::new().with_user(5, Role::View, true));
	let channel = RecordingChannel::new();
	let h = handlers(repo, Arc::clone(&channel));

	h.handle_callback(ChatId(5), "button:weather").await;
	let keyboards = channel.keyboards_for(5);
	assert_eq!(keyboards.len(), 1);
	assert_eq!(
		keyboards[0].inline_keyboard[0][0].callback_data.as_deref(),
		Some("button:weather,farm:1")
	);
}

#[tokio::test]
async fn store_failure_answers_temporarily_unavailable() {
	let repo = Arc::new(FakeRepo::new().with_user(5, Role::View, true));
	let channel = RecordingChannel::new();
	let h = handlers(Arc::clone(&repo), Arc::clone(&channel));

	repo.fail_everything();
	h.handle_callback(ChatId(5), "button:weather,farm:1").await;
	assert_eq!(channel.texts_for(5), vec![UNAVAILABLE.to_string()]);
}

#[tokio::test]
async fn registration_records_the_user_and_pages_admins() {
	let repo = Arc::new(FakeRepo::new());
	let channel = RecordingChannel::new();
	let h = handlers(Arc::clone(&repo), Arc::clone(&channel));

	h.handle_text(ChatId(5), "/reg").await;

	assert!(repo.users.lock().unwrap().contains_key(&5));
	let applicant = channel.texts_for(5);
	assert!(applicant[0].contains("awaiting approval"));
	let admin = channel.texts_for(100);
	assert_eq!(admin.len(), 1);
	assert!(admin[0].contains("Chat id: 5"));
	let admin_keyboards = channel.keyboards_for(100);
	assert_eq!(admin_keyboards[0].inline_keyboard[0].len(), 3);
}

#[tokio::test]
async fn approval_confirms_and_notifies_both_sides() {
	let repo = Arc::new(
		FakeRepo::new()
			.with_user(100, Role::Programmer, true)
			.with_user(5, Role::View, false),
	);
	let channel = RecordingChannel::new();
	let h = handlers(Arc::clone(&repo), Arc::clone(&channel));

	h.handle_callback(ChatId(100), "button:regconfirm,user:5,verdict:approve")
		.await;

	assert!(repo.users.lock().unwrap().get(&5).unwrap().confirmed);
	assert!(channel.texts_for(5)[0].contains("approved"));
	assert!(channel.texts_for(100)[0].contains("Approved 5"));
}

#[tokio::test]
async fn non_admin_cannot_rule_on_registrations() {
	let repo = Arc::new(
		FakeRepo::new()
			.with_user(6, Role::View, true)
			.with_user(5, Role::View, false),
	);
	let channel = RecordingChannel::new();
	let h = handlers(Arc::clone(&repo), Arc::clone(&channel));

	h.handle_callback(ChatId(6), "button:regconfirm,user:5,verdict:approve")
		.await;

	assert!(!repo.users.lock().unwrap().get(&5).unwrap().confirmed);
	assert!(channel.texts_for(6)[0].contains("not allowed"));
}

#[tokio::test]
async fn admins_can_list_registered_users() {
	let repo = Arc::new(
		FakeRepo::new()
			.with_user(100, Role::Programmer, true)
			.with_user(5, Role::View, false),
	);
	let channel = RecordingChannel::new();
	let h = handlers(repo, Arc::clone(&channel));

	h.handle_text(ChatId(100), "/users").await;
	let texts = channel.texts_for(100);
	assert_eq!(texts.len(), 1);
	assert!(texts[0].contains("Registered users"));
	assert!(texts[0].contains("5: Ann, view, pending"));
	assert!(texts[0].contains("100: Ann, programmer, confirmed"));
}

#[tokio::test]
async fn user_listing_is_admin_only() {
	let repo = Arc::new(FakeRepo::new().with_user(5, Role::View, true));
	let channel = RecordingChannel::new();
	let h = handlers(repo, Arc::clone(&channel));

	h.handle_text(ChatId(5), "/users").await;
	let texts = channel.texts_for(5);
	assert_eq!(texts.len(), 1);
	assert!(texts[0].contains("administrators"));
}

#[tokio::test]
async fn menu_gate_follows_the_role() {
	let repo = Arc::new(
		FakeRepo::new()
			.with_user(5, Role::View, true)
			.with_user(9, Role::Broadcast, true),
	);
	let gate = StoreMenuGate::new(repo);

	use fieldwatch_delivery::MenuGate;
	assert!(gate.wants_menu_prompt(ChatId(5)).await);
	assert!(!gate.wants_menu_prompt(ChatId(9)).await);
	assert!(!gate.wants_menu_prompt(ChatId(404)).await);
}
