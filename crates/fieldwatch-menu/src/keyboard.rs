// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Inline keyboard construction.
//!
//! Menus are declared as ordered rows of [`ButtonKind`]s; each kind knows
//! its label and callback payload. A kind that is missing the context it
//! needs simply produces no button, so a partially configured menu degrades
//! to fewer buttons instead of emitting a payload the parser would reject.

use fieldwatch_core::FarmId;
use fieldwatch_delivery::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::callback::CallbackAction;

/// A menu entry to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonKind {
	MainMenu,
	Register,
	Help,
	/// Current weather for a farm. Needs the farm.
	Weather(Option<FarmId>),
	/// Weather archive drill-down entry point for a farm.
	Archive(Option<FarmId>),
	/// Forecast drill-down entry point for a farm.
	Forecast(Option<FarmId>),
	/// Station battery voltages for a farm.
	Battery(Option<FarmId>),
	CameraStatus,
	StationStatus,
	/// An arbitrary labelled action, for drill-down menus built from rows.
	Action(String, CallbackAction),
	/// External link button.
	Link(String, String),
}

impl ButtonKind {
	/// Render the entry, or nothing if its context is missing.
	pub fn button(&self) -> Option<InlineKeyboardButton> {
		match self {
			Self::MainMenu => Some(callback("Main menu", CallbackAction::Menu)),
			Self::Register => Some(callback("Registration", CallbackAction::Register)),
			Self::Help => Some(callback("Help", CallbackAction::Help)),
			Self::Weather(farm) => farm.map(|farm| {
				callback("Current weather", CallbackAction::Weather { farm: Some(farm) })
			}),
			Self::Archive(farm) => farm.map(|farm| {
				callback(
					"Weather archive",
					CallbackAction::Archive {
						farm: Some(farm),
						station: None,
						week: None,
					},
				)
			}),
			Self::Forecast(farm) => farm.map(|farm| {
				callback(
					"Forecast",
					CallbackAction::Forecast {
						farm: Some(farm),
						zone: None,
						date: None,
					},
				)
			}),
			Self::Battery(farm) => farm.map(|farm| {
				callback("Station battery", CallbackAction::Battery { farm: Some(farm) })
			}),
			Self::CameraStatus => Some(callback("Cameras", CallbackAction::Cameras)),
			Self::StationStatus => Some(callback("Weather stations", CallbackAction::Stations)),
			Self::Action(label, action) => Some(callback(label, action.clone())),
			Self::Link(label, url) => Some(InlineKeyboardButton::link(label.clone(), url.clone())),
		}
	}
}

fn callback(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
	InlineKeyboardButton::callback(label, action.encode())
}

/// Build a keyboard from ordered rows of entries.
///
/// Entries without context vanish; rows left empty by that vanish too.
pub fn build_keyboard(rows: &[Vec<ButtonKind>]) -> InlineKeyboardMarkup {
	let mut markup = InlineKeyboardMarkup::default();
	for row in rows {
		markup.push_row(row.iter().filter_map(ButtonKind::button).collect());
	}
	markup
}
