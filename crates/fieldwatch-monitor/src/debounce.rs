// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Debounced health monitoring.
//!
//! A monitor polls its check on a short interval, but a single bad poll is
//! never an incident: the check must fail twice, one confirmation delay
//! apart, before an alert goes out. After alerting, the monitor sleeps a
//! long suppression window so a broken device pages once, not every second.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use fieldwatch_core::{
	compose_alert, compose_camera_outage, CheckOutcome, FaultyDevice, MonitoredDomain,
	OperatingHours, RecipientSet,
};
use fieldwatch_delivery::{MessageChannel, OutboundMessage, ReliableSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cancel::CancellationToken;
use crate::error::Result;

/// A health predicate over one monitored domain.
///
/// Each sample is independent; the monitor never feeds earlier outcomes
/// back into the check.
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
	fn domain(&self) -> MonitoredDomain;

	async fn sample(&self) -> Result<CheckOutcome>;
}

/// Timing and gating knobs for a debounced monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
	/// Pause between healthy polls.
	pub poll_interval: Duration,
	/// Wait between the first bad poll and the confirming poll.
	pub confirm_delay: Duration,
	/// Quiet period after an alert is sent.
	pub suppression: Duration,
	/// Local-time window outside which the monitor idles.
	pub hours: OperatingHours,
	/// Device ids silenced while known-bad hardware awaits repair.
	pub exclusions: Vec<i32>,
	/// Clock read before each poll; tests swap in a fixed one.
	pub now: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
	Local::now().naive_local()
}

impl Default for MonitorConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(1),
			confirm_delay: Duration::from_secs(60),
			suppression: Duration::from_secs(7200),
			hours: OperatingHours::default(),
			exclusions: Vec::new(),
			now: local_now,
		}
	}
}

/// The 2-of-2 debounce loop around a [`HealthCheck`].
pub struct DebouncedMonitor<H, C> {
	check: H,
	sender: Arc<ReliableSender<C>>,
	recipients: RecipientSet,
	config: MonitorConfig,
	token: CancellationToken,
}

impl<H, C> DebouncedMonitor<H, C>
where
	H: HealthCheck,
	C: MessageChannel + 'static,
{
	pub fn new(
		check: H,
		sender: Arc<ReliableSender<C>>,
		recipients: RecipientSet,
		config: MonitorConfig,
	) -> Self {
		Self {
			check,
			sender,
			recipients,
			config,
			token: CancellationToken::new(),
		}
	}

	/// Token for stopping the loop from outside.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.token.clone()
	}

	pub fn spawn(self) -> JoinHandle<()> {
		tokio::spawn(self.run())
	}

	pub async fn run(self) {
		let domain = self.check.domain();
		info!(%domain, "monitor loop started");

		loop {
			if self.token.is_cancelled() {
				break;
			}
			if !self.config.hours.contains((self.config.now)()) {
				tokio::time::sleep(self.config.poll_interval).await;
				continue;
			}

			let first = match self.check.sample().await {
				Ok(outcome) => outcome,
				Err(e) => {
					warn!(%domain, error = %e, "sample failed, skipping cycle");
					tokio::time::sleep(self.config.poll_interval).await;
					continue;
				}
			};

			if first.is_unhealthy() {
				tokio::time::sleep(self.config.confirm_delay).await;
				if self.token.is_cancelled() {
					break;
				}
				match self.check.sample().await {
					Ok(second) if second.is_unhealthy() => {
						let faults = second.faults_excluding(&self.config.exclusions);
						if !faults.is_empty() {
							info!(%domain, fault_count = faults.len(), "incident confirmed, alerting");
							self.notify(&faults).await;
							tokio::time::sleep(self.config.suppression).await;
							continue;
						}
					}
					Ok(_) => {
						// Transient blip: the confirming sample recovered.
					}
					Err(e) => {
						warn!(%domain, error = %e, "confirming sample failed, skipping cycle");
					}
				}
			}

			tokio::time::sleep(self.config.poll_interval).await;
		}

		info!(%domain, "monitor loop stopped");
	}

	async fn notify(&self, faults: &[FaultyDevice]) {
		match self.check.domain() {
			// Camera outages carry a per-device location attachment.
			MonitoredDomain::Cameras => {
				for cam in faults {
					let text = OutboundMessage::text(compose_camera_outage(cam));
					self.sender.deliver(&self.recipients, &text).await;
					if let Some((lat, lon)) = cam.location {
						let pin = OutboundMessage::location(lat, lon);
						self.sender.deliver(&self.recipients, &pin).await;
					}
				}
			}
			domain => {
				let text = OutboundMessage::text(compose_alert(domain, faults));
				self.sender.deliver(&self.recipients, &text).await;
			}
		}
	}
}
