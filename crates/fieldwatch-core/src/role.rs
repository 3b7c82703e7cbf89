// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recipient roles.
//!
//! Roles gate which menu entries a recipient sees and whether they receive
//! the "back to main menu" follow-up after broadcast alerts. The numeric
//! codes match the values stored in the `role` column of the users table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access role for a registered recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Farm staff: weather/forecast menus for their own farm only.
	View,
	/// Maintainers: everything, including the admin menu.
	Programmer,
	/// Office staff: weather/forecast menus across all farms.
	ViewAll,
	/// Security staff: camera status in addition to the basic menus.
	Security,
	/// Broadcast-only recipients: no interactive menu at all.
	Broadcast,
}

impl Role {
	/// Decode the numeric role code from the data store.
	pub fn from_code(code: i32) -> Option<Self> {
		match code {
			1 => Some(Self::View),
			2 => Some(Self::Programmer),
			3 => Some(Self::ViewAll),
			4 => Some(Self::Security),
			9999 => Some(Self::Broadcast),
			_ => None,
		}
	}

	/// Numeric code as stored in the data store.
	pub fn code(&self) -> i32 {
		match self {
			Self::View => 1,
			Self::Programmer => 2,
			Self::ViewAll => 3,
			Self::Security => 4,
			Self::Broadcast => 9999,
		}
	}

	/// Whether this role may see camera status.
	pub fn can_view_cameras(&self) -> bool {
		matches!(self, Self::Programmer | Self::Security)
	}

	/// Whether this role receives an interactive menu at all.
	pub fn has_menu(&self) -> bool {
		!matches!(self, Self::Broadcast)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::View => write!(f, "view"),
			Self::Programmer => write!(f, "programmer"),
			Self::ViewAll => write!(f, "view_all"),
			Self::Security => write!(f, "security"),
			Self::Broadcast => write!(f, "broadcast"),
		}
	}
}
