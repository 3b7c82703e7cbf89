// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! fieldwatch bot entry point.
//!
//! Startup order: logging, config, database, channel, then the background
//! monitors and digest schedules, and finally the foreground update loop.
//! Unresolvable token/database configuration is fatal; everything after
//! startup is contained per loop iteration.

mod config;
mod error;
mod handlers;
mod jobs;
mod updates;

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fieldwatch_core::{FarmId, RecipientSet};
use fieldwatch_delivery::{BotToken, OutboundMessage, ReliableSender, TelegramChannel};
use fieldwatch_menu::{build_keyboard, ButtonKind};
use fieldwatch_monitor::{
	CameraCheck, DailySchedule, DebouncedMonitor, ImageryWatcher, MonitorConfig, NullReadingCheck,
	RecurringHandle, RecurringTask, StationCheck,
};
use fieldwatch_store::{PgTelemetryRepository, Prober, TcpProber, TelemetryRepository};

use config::{Args, BotConfig};
use error::BotError;
use handlers::{Handlers, StoreMenuGate};
use jobs::{CityForecastJob, DigestSlot, RainSummaryJob};
use updates::UpdateLoop;

#[tokio::main]
async fn main() -> Result<(), BotError> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let args = Args::parse();
	let token = match args.token() {
		Ok(t) => t.to_string(),
		Err(e) => {
			error!("{e}");
			std::process::exit(1);
		}
	};
	let database_url = match args.database_url() {
		Ok(u) => u.to_string(),
		Err(e) => {
			error!("{e}");
			std::process::exit(1);
		}
	};

	let config = if args.config.exists() {
		Arc::new(BotConfig::load(&args.config)?)
	} else {
		info!(path = %args.config.display(), "no config file, using defaults");
		Arc::new(BotConfig::default())
	};
	info!(
		farms = config.farms.len(),
		admins = config.recipients.admins.len(),
		"configuration loaded"
	);

	let pool = PgPoolOptions::new()
		.max_connections(5)
		.connect(&database_url)
		.await?;
	let repo: Arc<dyn TelemetryRepository> = Arc::new(PgTelemetryRepository::new(pool));
	let prober: Arc<dyn Prober> =
		Arc::new(TcpProber::new(config.probe.port, config.probe.timeout()));
	let channel = Arc::new(TelegramChannel::new(BotToken::new(token))?);

	let menu_prompt = OutboundMessage::text_with_keyboard(
		"Back to the main menu:",
		build_keyboard(&[vec![ButtonKind::MainMenu]]),
	);
	let sender = Arc::new(
		ReliableSender::new(Arc::clone(&channel))
			.with_menu_prompt(menu_prompt, Arc::new(StoreMenuGate::new(Arc::clone(&repo)))),
	);

	let mut monitor_tokens = Vec::new();
	let mut schedule_handles: Vec<RecurringHandle> = Vec::new();

	// Equipment monitors, one loop per domain.
	let monitor_config = |exclusions: Vec<i32>| MonitorConfig {
		poll_interval: config.monitor.poll_interval(),
		confirm_delay: config.monitor.confirm_delay(),
		suppression: config.monitor.suppression(),
		hours: config.monitor.operating_hours(),
		exclusions,
		..MonitorConfig::default()
	};

	if !config.recipients.cameras.is_empty() {
		let monitor = DebouncedMonitor::new(
			CameraCheck::new(Arc::clone(&repo), Arc::clone(&prober)),
			Arc::clone(&sender),
			RecipientSet::from(config.recipients.cameras.clone()),
			monitor_config(config.monitor.excluded_cameras.clone()),
		);
		monitor_tokens.push(monitor.cancellation_token());
		monitor.spawn();
	}
	if !config.recipients.stations.is_empty() {
		let monitor = DebouncedMonitor::new(
			StationCheck::new(Arc::clone(&repo), Arc::clone(&prober)),
			Arc::clone(&sender),
			RecipientSet::from(config.recipients.stations.clone()),
			monitor_config(config.monitor.excluded_stations.clone()),
		);
		monitor_tokens.push(monitor.cancellation_token());
		monitor.spawn();

		let monitor = DebouncedMonitor::new(
			NullReadingCheck::new(Arc::clone(&repo)),
			Arc::clone(&sender),
			RecipientSet::from(config.recipients.stations.clone()),
			monitor_config(Vec::new()),
		);
		monitor_tokens.push(monitor.cancellation_token());
		monitor.spawn();
	}
	if !config.recipients.imagery.is_empty() && !config.farms.is_empty() {
		let watcher = Arc::new(ImageryWatcher::new(
			Arc::clone(&repo),
			Arc::clone(&sender),
			RecipientSet::from(config.recipients.imagery.clone()),
			config.farms.iter().map(|&id| FarmId(id)).collect(),
		));
		schedule_handles.push(RecurringTask::every(config.monitor.imagery_poll()).spawn(watcher));
	}

	// Digest schedules.
	if !config.recipients.rain_digest.is_empty() {
		let job = Arc::new(RainSummaryJob::new(
			Arc::clone(&repo),
			Arc::clone(&sender),
			RecipientSet::from(config.recipients.rain_digest.clone()),
		));
		schedule_handles.push(DailySchedule::at(config.forecast.morning_time()?).spawn(job));
	}
	if let Some(api_key) = &config.forecast.api_key {
		if !config.recipients.forecast_digest.is_empty() {
			let recipients = RecipientSet::from(config.recipients.forecast_digest.clone());
			let morning = Arc::new(CityForecastJob::new(
				api_key.clone(),
				config.forecast.city.clone(),
				DigestSlot::Morning,
				Arc::clone(&sender),
				recipients.clone(),
			));
			schedule_handles.push(DailySchedule::at(config.forecast.morning_time()?).spawn(morning));

			let evening = Arc::new(CityForecastJob::new(
				api_key.clone(),
				config.forecast.city.clone(),
				DigestSlot::Evening,
				Arc::clone(&sender),
				recipients,
			));
			schedule_handles.push(DailySchedule::at(config.forecast.evening_time()?).spawn(evening));
		}
	}

	info!(
		monitors = monitor_tokens.len(),
		schedules = schedule_handles.len(),
		"background loops armed"
	);

	let handlers = Arc::new(Handlers::new(
		repo,
		prober,
		Arc::clone(&sender),
		Arc::clone(&config),
	));
	let update_loop = UpdateLoop::new(channel, handlers);
	let loop_token = update_loop.cancellation_token();

	tokio::select! {
		_ = update_loop.run() => {}
		_ = tokio::signal::ctrl_c() => {
			info!("shutdown requested");
		}
	}

	loop_token.cancel();
	for token in &monitor_tokens {
		token.cancel();
	}
	for handle in schedule_handles {
		handle.cancel();
	}
	info!("fieldwatch bot stopped");
	Ok(())
}
