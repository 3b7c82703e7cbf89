// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data-store access for fieldwatch.
//!
//! This crate provides:
//! - [`TelemetryRepository`]: the lookup surface the bot and the monitors
//!   use (users, stations, observations, forecast zones, imagery ids)
//! - [`PgTelemetryRepository`]: the Postgres implementation over sqlx
//! - [`Prober`]: the reachability predicate used by equipment checks, with
//!   a bounded-timeout TCP implementation
//!
//! The monitoring core treats every lookup as a synchronous, possibly
//! failing call; a failed lookup means "cannot evaluate this cycle", never
//! a false incident.

pub mod error;
pub mod probe;
pub mod repository;
pub mod rows;

pub use error::{Result, StoreError};
pub use probe::{Prober, TcpProber};
pub use repository::{PgTelemetryRepository, TelemetryRepository};
pub use rows::{
	ArchiveDaySummary, CameraRow, ForecastDay, NewUser, StationRow, UserRecord,
	WeatherObservation, ZoneRow,
};
