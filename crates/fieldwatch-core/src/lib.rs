// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core domain types for the fieldwatch notification bot.
//!
//! This crate holds the vocabulary shared by every other fieldwatch crate:
//! - Identifier newtypes for farms, stations, cameras, zones, and chats
//! - Check outcomes produced by monitor polls
//! - Recipient sets for fan-out delivery
//! - Operating-hours windows for gating background checks
//! - Pure alert-composition functions (no state, no I/O)

pub mod check;
pub mod compose;
pub mod hours;
pub mod ids;
pub mod recipients;
pub mod role;

pub use check::{CheckOutcome, FaultyDevice, MonitoredDomain};
pub use compose::{
	compose_alert, compose_camera_outage, compose_imagery, compose_rain_summary, compose_status,
	RainfallRow, AUTO_HEADER,
};
pub use hours::OperatingHours;
pub use ids::{CameraId, ChatId, FarmId, StationId, ZoneId};
pub use recipients::RecipientSet;
pub use role::Role;
