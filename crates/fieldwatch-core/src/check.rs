// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Check outcomes produced by monitor polls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of equipment/state being checked for health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoredDomain {
	/// Surveillance camera reachability.
	Cameras,
	/// Weather-station reachability.
	WeatherStations,
	/// Stations reporting null sensor readings.
	NullReadings,
	/// New satellite imagery arrival.
	Imagery,
}

impl fmt::Display for MonitoredDomain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Cameras => write!(f, "cameras"),
			Self::WeatherStations => write!(f, "weather_stations"),
			Self::NullReadings => write!(f, "null_readings"),
			Self::Imagery => write!(f, "imagery"),
		}
	}
}

/// A faulty entity reported by an unhealthy check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultyDevice {
	/// Opaque device id (camera id, station id).
	pub id: i32,
	/// Human-readable name ("Gate", "Novokievka").
	pub name: String,
	/// Network address the probe targeted.
	pub addr: String,
	/// Device coordinates, when known (lat, lon).
	pub location: Option<(f64, f64)>,
	/// Sensor fields found null, for null-reading checks.
	pub null_fields: Vec<String>,
}

impl FaultyDevice {
	pub fn new(id: i32, name: impl Into<String>, addr: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
			addr: addr.into(),
			location: None,
			null_fields: Vec::new(),
		}
	}

	pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
		self.location = Some((lat, lon));
		self
	}

	pub fn with_null_fields(mut self, fields: Vec<String>) -> Self {
		self.null_fields = fields;
		self
	}
}

/// Tagged outcome of a single poll of a monitored domain.
///
/// Produced fresh on every poll and never mutated; the debounce logic only
/// compares the incident flag of consecutive outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
	Healthy,
	Unhealthy(Vec<FaultyDevice>),
}

impl CheckOutcome {
	/// Build an outcome from a (possibly empty) list of faulty devices.
	pub fn from_faults(faults: Vec<FaultyDevice>) -> Self {
		if faults.is_empty() {
			Self::Healthy
		} else {
			Self::Unhealthy(faults)
		}
	}

	pub fn is_unhealthy(&self) -> bool {
		matches!(self, Self::Unhealthy(_))
	}

	/// Faulty devices with the excluded ids filtered out.
	///
	/// The exclusion list carries known-bad hardware pending repair that
	/// must not keep re-alerting.
	pub fn faults_excluding(&self, excluded: &[i32]) -> Vec<FaultyDevice> {
		match self {
			Self::Healthy => Vec::new(),
			Self::Unhealthy(faults) => faults
				.iter()
				.filter(|d| !excluded.contains(&d.id))
				.cloned()
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_faults_are_healthy() {
		assert_eq!(CheckOutcome::from_faults(vec![]), CheckOutcome::Healthy);
	}

	#[test]
	fn non_empty_faults_are_unhealthy() {
		let outcome = CheckOutcome::from_faults(vec![FaultyDevice::new(1, "Gate", "10.0.0.1")]);
		assert!(outcome.is_unhealthy());
	}

	#[test]
	fn exclusion_filters_by_id() {
		let outcome = CheckOutcome::from_faults(vec![
			FaultyDevice::new(1, "Gate", "10.0.0.1"),
			FaultyDevice::new(9, "Yard", "10.0.0.9"),
		]);
		let remaining = outcome.faults_excluding(&[9]);
		assert_eq!(remaining.len(), 1);
		assert_eq!(remaining[0].id, 1);
	}

	#[test]
	fn exclusion_can_silence_the_whole_outcome() {
		let outcome = CheckOutcome::from_faults(vec![FaultyDevice::new(9, "Yard", "10.0.0.9")]);
		assert!(outcome.faults_excluding(&[9]).is_empty());
	}
}
