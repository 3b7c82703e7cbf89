// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operating-hours windows for gating background checks.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A daily time-of-day window, optionally restricted to weekdays.
///
/// Background equipment monitors only probe inside this window so that
/// nobody is paged about a dead camera at 3am on a Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
	pub start: NaiveTime,
	pub end: NaiveTime,
	/// Skip Saturday and Sunday entirely.
	pub weekdays_only: bool,
}

impl OperatingHours {
	pub fn new(start: NaiveTime, end: NaiveTime, weekdays_only: bool) -> Self {
		Self {
			start,
			end,
			weekdays_only,
		}
	}

	/// A window that never gates: probing is allowed at any instant.
	pub fn always() -> Self {
		Self {
			start: NaiveTime::MIN,
			end: NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
			weekdays_only: false,
		}
	}

	/// Whether the given local instant falls inside the window.
	pub fn contains(&self, now: NaiveDateTime) -> bool {
		if self.weekdays_only && matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
			return false;
		}
		let t = now.time();
		self.start <= t && t <= self.end
	}
}

impl Default for OperatingHours {
	/// The source system's staffed window: 08:00-17:00, weekdays.
	fn default() -> Self {
		Self {
			start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
			end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
			weekdays_only: true,
		}
	}
}
