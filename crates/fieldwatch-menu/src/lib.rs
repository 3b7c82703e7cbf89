// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Menu boundary for fieldwatch.
//!
//! This crate provides:
//! - [`CallbackAction`]: the closed, validated form of a button press,
//!   parsed from stateless `key:value` callback payloads
//! - [`ButtonKind`] and [`build_keyboard`]: ordered inline keyboard
//!   construction that can never emit a payload the parser rejects

pub mod callback;
pub mod error;
pub mod keyboard;

pub use callback::{CallbackAction, Verdict};
pub use error::{MenuError, Result};
pub use keyboard::{build_keyboard, ButtonKind};
