// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for callback payload parsing.

use thiserror::Error;

/// Result type for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Why a callback payload was rejected.
///
/// A rejected payload is answered with a generic prompt and logged; it is
/// never partially interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
	#[error("empty callback payload")]
	Empty,

	#[error("malformed pair {0:?}, expected key:value")]
	MalformedPair(String),

	#[error("duplicate key {0:?}")]
	DuplicateKey(String),

	#[error("payload has no button key")]
	MissingButton,

	#[error("unknown button {0:?}")]
	UnknownButton(String),

	#[error("key {key:?} is not valid for button {button:?}")]
	UnknownKey { button: String, key: String },

	#[error("invalid value {value:?} for key {key:?}")]
	InvalidValue { key: String, value: String },
}
