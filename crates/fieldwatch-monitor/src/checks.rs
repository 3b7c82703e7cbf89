// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Concrete health checks over the telemetry store.

use std::sync::Arc;

use async_trait::async_trait;
use fieldwatch_core::{CheckOutcome, FaultyDevice, MonitoredDomain};
use fieldwatch_store::{Prober, TelemetryRepository};

use crate::debounce::HealthCheck;
use crate::error::Result;

/// Probes every registered camera for reachability.
pub struct CameraCheck {
	repo: Arc<dyn TelemetryRepository>,
	prober: Arc<dyn Prober>,
}

impl CameraCheck {
	pub fn new(repo: Arc<dyn TelemetryRepository>, prober: Arc<dyn Prober>) -> Self {
		Self { repo, prober }
	}
}

#[async_trait]
impl HealthCheck for CameraCheck {
	fn domain(&self) -> MonitoredDomain {
		MonitoredDomain::Cameras
	}

	async fn sample(&self) -> Result<CheckOutcome> {
		let cameras = self.repo.list_cameras().await?;
		let probes = cameras.iter().map(|cam| {
			let prober = Arc::clone(&self.prober);
			async move { (cam, prober.is_reachable(&cam.addr).await) }
		});
		let faults = futures::future::join_all(probes)
			.await
			.into_iter()
			.filter(|(_, reachable)| !reachable)
			.map(|(cam, _)| {
				let mut fault = FaultyDevice::new(cam.id.0, cam.name.clone(), cam.addr.clone());
				if let (Some(lat), Some(lon)) = (cam.lat, cam.lon) {
					fault = fault.with_location(lat, lon);
				}
				fault
			})
			.collect();
		Ok(CheckOutcome::from_faults(faults))
	}
}

/// Probes every weather station for reachability.
pub struct StationCheck {
	repo: Arc<dyn TelemetryRepository>,
	prober: Arc<dyn Prober>,
}

impl StationCheck {
	pub fn new(repo: Arc<dyn TelemetryRepository>, prober: Arc<dyn Prober>) -> Self {
		Self { repo, prober }
	}
}

#[async_trait]
impl HealthCheck for StationCheck {
	fn domain(&self) -> MonitoredDomain {
		MonitoredDomain::WeatherStations
	}

	async fn sample(&self) -> Result<CheckOutcome> {
		let stations = self.repo.list_stations().await?;
		let probes = stations.iter().map(|station| {
			let prober = Arc::clone(&self.prober);
			async move { (station, prober.is_reachable(&station.addr).await) }
		});
		let faults = futures::future::join_all(probes)
			.await
			.into_iter()
			.filter(|(_, reachable)| !reachable)
			.map(|(s, _)| FaultyDevice::new(s.id.0, s.name.clone(), s.addr.clone()))
			.collect();
		Ok(CheckOutcome::from_faults(faults))
	}
}

/// Flags stations whose latest observation has missing sensor readings.
///
/// A station with no observations at all is not flagged here; the
/// reachability check covers a station that stopped reporting.
pub struct NullReadingCheck {
	repo: Arc<dyn TelemetryRepository>,
}

impl NullReadingCheck {
	pub fn new(repo: Arc<dyn TelemetryRepository>) -> Self {
		Self { repo }
	}
}

#[async_trait]
impl HealthCheck for NullReadingCheck {
	fn domain(&self) -> MonitoredDomain {
		MonitoredDomain::NullReadings
	}

	async fn sample(&self) -> Result<CheckOutcome> {
		let stations = self.repo.list_stations().await?;
		let mut faults = Vec::new();
		for station in stations {
			if let Some(obs) = self.repo.latest_observation(station.id).await? {
				let missing = obs.null_fields();
				if !missing.is_empty() {
					faults.push(
						FaultyDevice::new(station.id.0, station.name, station.addr)
							.with_null_fields(missing),
					);
				}
			}
		}
		Ok(CheckOutcome::from_faults(faults))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testsupport::{FakeProber, FakeRepository};
	use fieldwatch_core::{CameraId, StationId};
	use fieldwatch_store::{CameraRow, StationRow};

	fn camera(id: i32, name: &str, addr: &str) -> CameraRow {
		CameraRow {
			id: CameraId(id),
			farm: fieldwatch_core::FarmId(1),
			name: name.to_string(),
			addr: addr.to_string(),
			lat: Some(48.7),
			lon: Some(44.5),
		}
	}

	fn station(id: i32, name: &str, addr: &str) -> StationRow {
		StationRow {
			id: StationId(id),
			name: name.to_string(),
			addr: addr.to_string(),
		}
	}

	#[tokio::test]
	async fn camera_check_reports_unreachable_cameras() {
		let repo = Arc::new(
			FakeRepository::new()
				.with_cameras(vec![camera(1, "Gate", "10.0.0.1"), camera(2, "Yard", "10.0.0.2")]),
		);
		let prober = Arc::new(FakeProber::reachable_only(vec!["10.0.0.1"]));

		let check = CameraCheck::new(repo, prober);
		let outcome = check.sample().await.unwrap();
		match outcome {
			CheckOutcome::Unhealthy(faults) => {
				assert_eq!(faults.len(), 1);
				assert_eq!(faults[0].id, 2);
				assert_eq!(faults[0].location, Some((48.7, 44.5)));
			}
			other => panic!("expected unhealthy, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn camera_check_is_healthy_when_all_respond() {
		let repo = Arc::new(FakeRepository::new().with_cameras(vec![camera(1, "Gate", "10.0.0.1")]));
		let prober = Arc::new(FakeProber::reachable_only(vec!["10.0.0.1"]));

		let check = CameraCheck::new(repo, prober);
		assert_eq!(check.sample().await.unwrap(), CheckOutcome::Healthy);
	}

	#[tokio::test]
	async fn station_check_reports_unreachable_stations() {
		let repo = Arc::new(FakeRepository::new().with_stations(vec![
			station(3, "Novokievka", "10.1.0.3"),
			station(5, "Krasnoarmeysky", "10.1.0.5"),
		]));
		let prober = Arc::new(FakeProber::reachable_only(vec!["10.1.0.5"]));

		let check = StationCheck::new(repo, prober);
		match check.sample().await.unwrap() {
			CheckOutcome::Unhealthy(faults) => {
				assert_eq!(faults.len(), 1);
				assert_eq!(faults[0].name, "Novokievka");
			}
			other => panic!("expected unhealthy, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn null_reading_check_names_the_missing_fields() {
		let repo = Arc::new(
			FakeRepository::new()
				.with_stations(vec![station(3, "Novokievka", "10.1.0.3")])
				.with_observation(3, |obs| {
					obs.temperature = None;
					obs.humidity = None;
				}),
		);

		let check = NullReadingCheck::new(repo);
		match check.sample().await.unwrap() {
			CheckOutcome::Unhealthy(faults) => {
				assert_eq!(faults[0].null_fields, vec!["Temperature", "Humidity"]);
			}
			other => panic!("expected unhealthy, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn station_without_observations_is_not_flagged() {
		let repo = Arc::new(FakeRepository::new().with_stations(vec![station(3, "Novokievka", "-")]));
		let check = NullReadingCheck::new(repo);
		assert_eq!(check.sample().await.unwrap(), CheckOutcome::Healthy);
	}
}
