// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Callback payload parse/encode.
//!
//! Every inline button carries a stateless `key:value` payload, e.g.
//! `button:forecast,farm:3,zone:12`. The payload is parsed at the boundary
//! into a closed [`CallbackAction`]; anything malformed, duplicated, or
//! unknown is rejected as a whole rather than partially interpreted.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use fieldwatch_core::{ChatId, FarmId, StationId, ZoneId};

use crate::error::{MenuError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A registration verdict chosen by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
	Approve,
	Later,
	Reject,
}

impl Verdict {
	fn as_str(&self) -> &'static str {
		match self {
			Self::Approve => "approve",
			Self::Later => "later",
			Self::Reject => "reject",
		}
	}
}

impl FromStr for Verdict {
	type Err = ();

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"approve" => Ok(Self::Approve),
			"later" => Ok(Self::Later),
			"reject" => Ok(Self::Reject),
			_ => Err(()),
		}
	}
}

/// A fully validated button press.
///
/// Optional parameters drive drill-down: `Weather { farm: None }` asks the
/// user to pick a farm, `Weather { farm: Some(_) }` answers the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
	/// Return to the role-specific main menu.
	Menu,
	/// Start the registration flow.
	Register,
	/// An administrator ruling on a pending registration.
	ConfirmRegistration { user: ChatId, verdict: Verdict },
	Help,
	Weather {
		farm: Option<FarmId>,
	},
	Archive {
		farm: Option<FarmId>,
		station: Option<StationId>,
		week: Option<NaiveDate>,
	},
	Forecast {
		farm: Option<FarmId>,
		zone: Option<ZoneId>,
		date: Option<NaiveDate>,
	},
	Cameras,
	Stations,
	Battery {
		farm: Option<FarmId>,
	},
}

/// Parsed `key:value` pairs with duplicate detection and typed extraction.
struct Pairs {
	button: String,
	params: Vec<(String, String)>,
}

impl Pairs {
	fn parse(payload: &str) -> Result<Self> {
		if payload.trim().is_empty() {
			return Err(MenuError::Empty);
		}
		let mut button = None;
		let mut params: Vec<(String, String)> = Vec::new();
		for pair in payload.split(',') {
			let (key, value) = pair
				.split_once(':')
				.ok_or_else(|| MenuError::MalformedPair(pair.to_string()))?;
			if value.is_empty() || key.is_empty() {
				return Err(MenuError::MalformedPair(pair.to_string()));
			}
			if key == "button" {
				if button.is_some() {
					return Err(MenuError::DuplicateKey("button".to_string()));
				}
				button = Some(value.to_string());
			} else {
				if params.iter().any(|(k, _)| k == key) {
					return Err(MenuError::DuplicateKey(key.to_string()));
				}
				params.push((key.to_string(), value.to_string()));
			}
		}
		let button = button.ok_or(MenuError::MissingButton)?;
		Ok(Self { button, params })
	}

	fn take<T: FromStr>(&mut self, key: &str) -> Result<Option<T>> {
		let Some(pos) = self.params.iter().position(|(k, _)| k == key) else {
			return Ok(None);
		};
		let (_, value) = self.params.remove(pos);
		value
			.parse()
			.map(Some)
			.map_err(|_| MenuError::InvalidValue {
				key: key.to_string(),
				value,
			})
	}

	fn take_date(&mut self, key: &str) -> Result<Option<NaiveDate>> {
		let Some(pos) = self.params.iter().position(|(k, _)| k == key) else {
			return Ok(None);
		};
		let (_, value) = self.params.remove(pos);
		NaiveDate::parse_from_str(&value, DATE_FORMAT)
			.map(Some)
			.map_err(|_| MenuError::InvalidValue {
				key: key.to_string(),
				value,
			})
	}

	fn require<T: FromStr>(&mut self, key: &str) -> Result<T> {
		self.take(key)?.ok_or_else(|| MenuError::MalformedPair(format!("missing {key}")))
	}

	/// Every key the button understands must have been consumed by now.
	fn finish(self) -> Result<()> {
		match self.params.into_iter().next() {
			None => Ok(()),
			Some((key, _)) => Err(MenuError::UnknownKey {
				button: self.button,
				key,
			}),
		}
	}
}

impl CallbackAction {
	/// Parse a callback payload, rejecting anything not understood.
	pub fn parse(payload: &str) -> Result<Self> {
		let mut pairs = Pairs::parse(payload)?;
		let action = match pairs.button.as_str() {
			"menu" => Self::Menu,
			"reg" => Self::Register,
			"regconfirm" => {
				let user = ChatId(pairs.require("user")?);
				let verdict: String = pairs.require("verdict")?;
				let verdict = verdict.parse().map_err(|()| MenuError::InvalidValue {
					key: "verdict".to_string(),
					value: verdict,
				})?;
				Self::ConfirmRegistration { user, verdict }
			}
			"help" => Self::Help,
			"weather" => Self::Weather {
				farm: pairs.take("farm")?,
			},
			"archive" => Self::Archive {
				farm: pairs.take("farm")?,
				station: pairs.take("station")?,
				week: pairs.take_date("week")?,
			},
			"forecast" => Self::Forecast {
				farm: pairs.take("farm")?,
				zone: pairs.take("zone")?,
				date: pairs.take_date("date")?,
			},
			"cameras" => Self::Cameras,
			"stations" => Self::Stations,
			"battery" => Self::Battery {
				farm: pairs.take("farm")?,
			},
			other => return Err(MenuError::UnknownButton(other.to_string())),
		};
		pairs.finish()?;
		Ok(action)
	}

	/// Encode the action back into its payload form.
	pub fn encode(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for CallbackAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Menu => write!(f, "button:menu"),
			Self::Register => write!(f, "button:reg"),
			Self::ConfirmRegistration { user, verdict } => {
				write!(f, "button:regconfirm,user:{user},verdict:{}", verdict.as_str())
			}
			Self::Help => write!(f, "button:help"),
			Self::Weather { farm } => {
				write!(f, "button:weather")?;
				write_param(f, "farm", farm)
			}
			Self::Archive {
				farm,
				station,
				week,
			} => {
				write!(f, "button:archive")?;
				write_param(f, "farm", farm)?;
				write_param(f, "station", station)?;
				write_date(f, "week", week)
			}
			Self::Forecast { farm, zone, date } => {
				write!(f, "button:forecast")?;
				write_param(f, "farm", farm)?;
				write_param(f, "zone", zone)?;
				write_date(f, "date", date)
			}
			Self::Cameras => write!(f, "button:cameras"),
			Self::Stations => write!(f, "button:stations"),
			Self::Battery { farm } => {
				write!(f, "button:battery")?;
				write_param(f, "farm", farm)
			}
		}
	}
}

fn write_param<T: fmt::Display>(
	f: &mut fmt::Formatter<'_>,
	key: &str,
	value: &Option<T>,
) -> fmt::Result {
	match value {
		Some(v) => write!(f, ",{key}:{v}"),
		None => Ok(()),
	}
}

fn write_date(f: &mut fmt::Formatter<'_>, key: &str, value: &Option<NaiveDate>) -> fmt::Result {
	match value {
		Some(d) => write!(f, ",{key}:{}", d.format(DATE_FORMAT)),
		None => Ok(()),
	}
}
