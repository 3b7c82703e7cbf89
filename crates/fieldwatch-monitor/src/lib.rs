// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background monitoring for fieldwatch.
//!
//! This crate provides:
//! - [`DebouncedMonitor`]: the 2-of-2 debounce loop (poll, confirm after a
//!   delay, alert, then suppress) over a [`HealthCheck`]
//! - [`CameraCheck`] / [`StationCheck`] / [`NullReadingCheck`]: the concrete
//!   checks over the telemetry store
//! - [`ImageryWatcher`]: one-shot notifications on new satellite imagery
//! - [`RecurringTask`] and [`DailySchedule`]: interval and wall-clock
//!   scheduling for digest jobs
//! - [`spawn_named`]: named detached task dispatch
//!
//! Every loop stops through a [`CancellationToken`] checked at each
//! suspension point.

pub mod cancel;
pub mod checks;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod imagery;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testsupport;

pub use cancel::CancellationToken;
pub use checks::{CameraCheck, NullReadingCheck, StationCheck};
pub use debounce::{DebouncedMonitor, HealthCheck, MonitorConfig};
pub use dispatch::spawn_named;
pub use error::{MonitorError, Result};
pub use imagery::ImageryWatcher;
pub use schedule::{DailySchedule, JobError, RecurringHandle, RecurringJob, RecurringTask};
