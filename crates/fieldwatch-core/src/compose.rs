// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure alert-composition functions.
//!
//! Everything here is a function from check results to human-readable
//! Markdown text. No state, no I/O, so each variant is independently
//! testable.

use crate::check::{FaultyDevice, MonitoredDomain};
use crate::ids::FarmId;
use chrono::NaiveDate;

/// Header prefixed to every background (non-interactive) alert.
pub const AUTO_HEADER: &str = "*[Automatic notification]*:";

/// Compose a background alert for a monitored domain.
///
/// An empty device list produces the "all clear" variant; a non-empty list
/// enumerates each faulty entity with its identifying fields.
pub fn compose_alert(domain: MonitoredDomain, faults: &[FaultyDevice]) -> String {
	if faults.is_empty() {
		return match domain {
			MonitoredDomain::Cameras => "All cameras are operational".to_string(),
			MonitoredDomain::WeatherStations => "All weather stations are operational".to_string(),
			MonitoredDomain::NullReadings => "All stations are reporting complete data".to_string(),
			MonitoredDomain::Imagery => "No new imagery".to_string(),
		};
	}

	match domain {
		MonitoredDomain::Cameras => {
			let mut text = format!("{AUTO_HEADER}\nCameras not responding:\n");
			for cam in faults {
				text.push_str(&format!(
					"\n*Camera*: {}\nCamera id: {}\nIP address: {}\n",
					cam.name, cam.id, cam.addr
				));
			}
			text
		}
		MonitoredDomain::WeatherStations => {
			let mut text = format!("{AUTO_HEADER}\nWeather stations not responding:\n");
			for station in faults {
				text.push_str(&format!(
					"\nStation: {}\nStation id: {}\nIP address: {}\n",
					station.name, station.id, station.addr
				));
			}
			text
		}
		MonitoredDomain::NullReadings => {
			let mut text = format!("{AUTO_HEADER}\nStations sending null readings:\n");
			for station in faults {
				text.push_str(&format!(
					"\nStation: {} (id {})\nMissing fields: {}\n",
					station.name,
					station.id,
					station.null_fields.join(", ")
				));
			}
			text
		}
		MonitoredDomain::Imagery => format!("{AUTO_HEADER}\nNew satellite imagery published"),
	}
}

/// Compose the single-camera outage message used when alerts carry a
/// per-device location attachment.
pub fn compose_camera_outage(cam: &FaultyDevice) -> String {
	format!(
		"{AUTO_HEADER}\nNo response from camera {}\n*Camera name*:\n{}\nIP address: {}\n\nCamera location: (see below)",
		cam.id, cam.name, cam.addr
	)
}

/// Compose the manual status reply for a camera/station query.
///
/// Unlike [`compose_alert`], this is the foreground answer to a menu button
/// press, so it has no automatic-notification header.
pub fn compose_status(domain: MonitoredDomain, faults: &[FaultyDevice]) -> String {
	if faults.is_empty() {
		return compose_alert(domain, faults);
	}
	let mut text = match domain {
		MonitoredDomain::Cameras => "Cameras currently not working:\n".to_string(),
		_ => "Weather stations currently not working:\n".to_string(),
	};
	for device in faults {
		text.push_str(&format!(
			"\nName: {}\nId: {}\nIP address: {}\n",
			device.name, device.id, device.addr
		));
	}
	text
}

/// Compose the new-imagery alert for a farm.
pub fn compose_imagery(farm: FarmId) -> String {
	format!(
		"{AUTO_HEADER}\nNew satellite imagery has been published for farm {farm}.\nYou can view it on the fieldwatch site."
	)
}

/// One station's rainfall total over the summary window.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallRow {
	pub station_name: String,
	pub total_mm: f64,
}

/// Compose the daily rainfall summary.
///
/// Stations with zero rainfall are dropped from the listing; if every
/// station is dry the "no rainfall" variant is produced.
pub fn compose_rain_summary(rows: &[RainfallRow], from: NaiveDate, to: NaiveDate) -> String {
	let wet: Vec<&RainfallRow> = rows.iter().filter(|r| r.total_mm != 0.0).collect();
	if wet.is_empty() {
		return format!(
			"{AUTO_HEADER}\nNo rainfall was recorded at any farm between {from} and {to}.\n"
		);
	}
	let mut text = format!(
		"{AUTO_HEADER}\nRainfall recorded between {from} and {to}\nacross all farms:"
	);
	for row in wet {
		text.push_str(&format!(
			"\n\nStation: {}\nRainfall: {} mm",
			row.station_name, row.total_mm
		));
	}
	text
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn all_clear_variants() {
		assert_eq!(
			compose_alert(MonitoredDomain::Cameras, &[]),
			"All cameras are operational"
		);
		assert_eq!(
			compose_alert(MonitoredDomain::WeatherStations, &[]),
			"All weather stations are operational"
		);
	}

	#[test]
	fn station_alert_enumerates_devices() {
		let faults = vec![
			FaultyDevice::new(3, "Novokievka", "10.1.0.3"),
			FaultyDevice::new(5, "Krasnoarmeysky", "10.1.0.5"),
		];
		let text = compose_alert(MonitoredDomain::WeatherStations, &faults);
		assert!(text.starts_with(AUTO_HEADER));
		assert!(text.contains("Novokievka"));
		assert!(text.contains("10.1.0.3"));
		assert!(text.contains("Krasnoarmeysky"));
		assert!(text.contains("Station id: 5"));
	}

	#[test]
	fn camera_outage_names_device_and_address() {
		let cam = FaultyDevice::new(1, "Gate", "10.0.0.1").with_location(48.7, 44.5);
		let text = compose_camera_outage(&cam);
		assert!(text.contains("Gate"));
		assert!(text.contains("10.0.0.1"));
		assert!(text.contains("see below"));
	}

	#[test]
	fn null_reading_alert_lists_fields() {
		let faults = vec![FaultyDevice::new(7, "Meteo_7", "-")
			.with_null_fields(vec!["Temperature".into(), "Humidity".into()])];
		let text = compose_alert(MonitoredDomain::NullReadings, &faults);
		assert!(text.contains("Meteo_7"));
		assert!(text.contains("Temperature, Humidity"));
	}

	#[test]
	fn rain_summary_drops_dry_stations() {
		let from = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
		let to = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();
		let rows = vec![
			RainfallRow {
				station_name: "Novokievka".into(),
				total_mm: 0.0,
			},
			RainfallRow {
				station_name: "Krasnoarmeysky".into(),
				total_mm: 1.7,
			},
		];
		let text = compose_rain_summary(&rows, from, to);
		assert!(!text.contains("Novokievka"));
		assert!(text.contains("Krasnoarmeysky"));
		assert!(text.contains("1.7 mm"));
	}

	#[test]
	fn rain_summary_no_rain_variant() {
		let from = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
		let to = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();
		let text = compose_rain_summary(&[], from, to);
		assert!(text.contains("No rainfall"));
	}
}
