// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! New-imagery watcher.
//!
//! Unlike the debounced equipment monitors, imagery arrival is an event,
//! not a fault: each observed increase of a farm's maximum imagery id
//! fires exactly one notification, with no confirmation pass and no
//! suppression window. The watcher is a [`RecurringJob`](crate::RecurringJob)
//! driven by a [`RecurringTask`](crate::RecurringTask) on a short interval.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fieldwatch_core::{compose_imagery, FarmId, RecipientSet};
use fieldwatch_delivery::{MessageChannel, OutboundMessage, ReliableSender};
use fieldwatch_store::TelemetryRepository;
use tracing::{info, warn};

use crate::schedule::{JobError, RecurringJob};

pub struct ImageryWatcher<C> {
	repo: Arc<dyn TelemetryRepository>,
	sender: Arc<ReliableSender<C>>,
	recipients: RecipientSet,
	farms: Vec<FarmId>,
	last_seen: Mutex<HashMap<FarmId, i64>>,
}

impl<C: MessageChannel + 'static> ImageryWatcher<C> {
	pub fn new(
		repo: Arc<dyn TelemetryRepository>,
		sender: Arc<ReliableSender<C>>,
		recipients: RecipientSet,
		farms: Vec<FarmId>,
	) -> Self {
		Self {
			repo,
			sender,
			recipients,
			farms,
			last_seen: Mutex::new(HashMap::new()),
		}
	}
}

#[async_trait]
impl<C: MessageChannel + 'static> RecurringJob for ImageryWatcher<C> {
	fn name(&self) -> &str {
		"imagery-watcher"
	}

	async fn run(&self) -> std::result::Result<(), JobError> {
		for farm in &self.farms {
			let max = match self.repo.max_imagery_id(*farm).await {
				Ok(Some(max)) => max,
				Ok(None) => continue,
				Err(e) => {
					warn!(%farm, error = %e, "imagery lookup failed, skipping cycle");
					continue;
				}
			};
			let prev = self.last_seen.lock().unwrap().get(farm).copied();
			match prev {
				Some(prev) if max > prev => {
					info!(%farm, imagery_id = max, "new imagery detected");
					let msg = OutboundMessage::text(compose_imagery(*farm));
					self.sender.deliver(&self.recipients, &msg).await;
					self.last_seen.lock().unwrap().insert(*farm, max);
				}
				Some(_) => {}
				None => {
					// Imagery present at the first pass is old news: adopt
					// the baseline without alerting.
					self.last_seen.lock().unwrap().insert(*farm, max);
				}
			}
		}
		Ok(())
	}
}
