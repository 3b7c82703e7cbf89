// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Named task dispatch.

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::info;

/// Spawn a detached background task, logging its name at spawn time.
///
/// The caller decides whether to keep the handle; fire-and-forget units
/// (one-shot alert sends, per-update handlers) drop it.
pub fn spawn_named<F>(name: &str, future: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	info!(task = name, "spawning background task");
	tokio::spawn(future)
}
