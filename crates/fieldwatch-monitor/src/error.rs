// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for monitoring operations.

use thiserror::Error;

/// Result type for monitoring operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors surfaced by a health check sample.
///
/// A failed sample means "cannot evaluate this cycle" and is never treated
/// as an equipment incident.
#[derive(Debug, Error)]
pub enum MonitorError {
	#[error("store error: {0}")]
	Store(#[from] fieldwatch_store::StoreError),
}
