// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recurring task scheduling.
//!
//! Two shapes: [`RecurringTask`] fires a job on a fixed interval (first fire
//! one interval after start, never immediately), and [`DailySchedule`] fires
//! at a fixed wall-clock time each day. Both run on a dedicated tokio task
//! and stop through a [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::cancel::CancellationToken;

/// What a failed job firing reports back to the scheduler.
pub type JobError = Box<dyn std::error::Error + Send + Sync>;

/// A unit of work fired by a scheduler.
#[async_trait]
pub trait RecurringJob: Send + Sync + 'static {
	fn name(&self) -> &str;

	/// One firing. An error is logged by the scheduler, which keeps its
	/// cadence regardless.
	async fn run(&self) -> std::result::Result<(), JobError>;
}

/// Handle to a running scheduler loop.
pub struct RecurringHandle {
	token: CancellationToken,
	handle: JoinHandle<()>,
}

impl RecurringHandle {
	/// Request cancellation; the loop exits at its next wakeup.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Cancel and wait for the loop to exit.
	pub async fn stop(self) {
		self.token.cancel();
		let _ = self.handle.await;
	}

	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}

/// Fixed-interval repetition with an optional run budget.
///
/// `max_runs: None` repeats until cancelled; `Some(k)` fires exactly `k`
/// times then stops on its own.
#[derive(Debug, Clone, Copy)]
pub struct RecurringTask {
	pub interval: Duration,
	pub max_runs: Option<u32>,
}

impl RecurringTask {
	pub fn every(interval: Duration) -> Self {
		Self {
			interval,
			max_runs: None,
		}
	}

	pub fn with_max_runs(mut self, max_runs: u32) -> Self {
		self.max_runs = Some(max_runs);
		self
	}

	#[instrument(skip(self, job), fields(job = job.name(), interval_secs = self.interval.as_secs()))]
	pub fn spawn(self, job: Arc<dyn RecurringJob>) -> RecurringHandle {
		let token = CancellationToken::new();
		let loop_token = token.clone();
		let handle = tokio::spawn(async move {
			let mut fired = 0u32;
			loop {
				tokio::time::sleep(self.interval).await;
				if loop_token.is_cancelled() {
					info!(job = job.name(), "recurring task cancelled");
					break;
				}
				if let Err(e) = job.run().await {
					warn!(job = job.name(), error = %e, "job run failed");
				}
				fired += 1;
				if let Some(max) = self.max_runs {
					if fired >= max {
						info!(job = job.name(), fired, "recurring task run budget exhausted");
						break;
					}
				}
			}
		});
		RecurringHandle { token, handle }
	}
}

/// Fires a job once a day at a fixed local wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
	pub at: NaiveTime,
}

impl DailySchedule {
	pub fn at(at: NaiveTime) -> Self {
		Self { at }
	}

	/// Time to sleep from `now` until the next firing instant.
	pub fn delay_from(&self, now: NaiveDateTime) -> Duration {
		let today = now.date().and_time(self.at);
		let next = if today > now {
			today
		} else {
			today + chrono::Duration::days(1)
		};
		(next - now).to_std().unwrap_or(Duration::ZERO)
	}

	#[instrument(skip(self, job), fields(job = job.name(), at = %self.at))]
	pub fn spawn(self, job: Arc<dyn RecurringJob>) -> RecurringHandle {
		let token = CancellationToken::new();
		let loop_token = token.clone();
		let handle = tokio::spawn(async move {
			loop {
				let delay = self.delay_from(Local::now().naive_local());
				tokio::time::sleep(delay).await;
				if loop_token.is_cancelled() {
					info!(job = job.name(), "daily schedule cancelled");
					break;
				}
				if let Err(e) = job.run().await {
					warn!(job = job.name(), error = %e, "job run failed");
				}
				// Step past the firing instant so a fast job does not
				// double-fire within the same second.
				tokio::time::sleep(Duration::from_secs(1)).await;
			}
		});
		RecurringHandle { token, handle }
	}
}
