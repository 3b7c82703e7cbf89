// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retry policy for transient delivery failures.
//!
//! The documented policy is retry-until-success: a transient channel fault
//! must never drop an alert. Unlike the original hot loop, attempts back
//! off exponentially up to a cap so a long outage does not busy-spin the
//! delivery path. Permanent rejections stop immediately.

use std::time::Duration;

/// Exponential backoff with a cap and jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
	pub base: Duration,
	pub factor: f64,
	pub cap: Duration,
}

impl RetryPolicy {
	pub fn new(base: Duration, factor: f64, cap: Duration) -> Self {
		Self { base, factor, cap }
	}

	/// Backoff before the given attempt (1-based), without jitter.
	pub fn delay(&self, attempt: u32) -> Duration {
		let exp = self.factor.powi(attempt.saturating_sub(1) as i32);
		let raw = self.base.as_secs_f64() * exp;
		Duration::from_secs_f64(raw.min(self.cap.as_secs_f64()))
	}

	/// Backoff with up to 10% random jitter added, to de-synchronize
	/// concurrent retry loops.
	pub fn jittered_delay(&self, attempt: u32) -> Duration {
		let d = self.delay(attempt);
		d + d.mul_f64(fastrand::f64() * 0.1)
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			base: Duration::from_secs(1),
			factor: 2.0,
			cap: Duration::from_secs(60),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn delay_grows_exponentially() {
		let policy = RetryPolicy::default();
		assert_eq!(policy.delay(1), Duration::from_secs(1));
		assert_eq!(policy.delay(2), Duration::from_secs(2));
		assert_eq!(policy.delay(3), Duration::from_secs(4));
		assert_eq!(policy.delay(4), Duration::from_secs(8));
	}

	#[test]
	fn delay_caps_at_max() {
		let policy = RetryPolicy::default();
		assert_eq!(policy.delay(10), Duration::from_secs(60));
		assert_eq!(policy.delay(100), Duration::from_secs(60));
	}

	#[test]
	fn jitter_stays_within_ten_percent() {
		let policy = RetryPolicy::default();
		for attempt in 1..8 {
			let plain = policy.delay(attempt);
			let jittered = policy.jittered_delay(attempt);
			assert!(jittered >= plain);
			assert!(jittered <= plain + plain.mul_f64(0.1));
		}
	}
}
