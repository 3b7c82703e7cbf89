// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identifier newtypes.
//!
//! All identifiers are opaque numeric keys into the external data store; the
//! newtypes exist so a station id can never be passed where a farm id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! numeric_id {
	($(#[$doc:meta])* $name:ident, $inner:ty) => {
		$(#[$doc])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub $inner);

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = ParseIntError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Ok(Self(s.parse()?))
			}
		}

		impl From<$inner> for $name {
			fn from(value: $inner) -> Self {
				Self(value)
			}
		}
	};
}

numeric_id!(
	/// A farm ("agro"), the top-level grouping for stations, zones, and imagery.
	FarmId,
	i32
);

numeric_id!(
	/// A weather station.
	StationId,
	i32
);

numeric_id!(
	/// A surveillance camera.
	CameraId,
	i32
);

numeric_id!(
	/// A forecast micro-zone within a farm.
	ZoneId,
	i32
);

numeric_id!(
	/// A chat/recipient identifier on the delivery channel.
	ChatId,
	i64
);
