// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-specific menu layouts.

use fieldwatch_core::{FarmId, Role};
use fieldwatch_delivery::InlineKeyboardMarkup;
use fieldwatch_menu::{build_keyboard, ButtonKind, CallbackAction};

/// The main menu a confirmed user of the given role sees.
pub fn main_menu(role: Role) -> InlineKeyboardMarkup {
	let weather_row = vec![
		ButtonKind::Action("Current weather".to_string(), CallbackAction::Weather { farm: None }),
		ButtonKind::Action(
			"Weather archive".to_string(),
			CallbackAction::Archive {
				farm: None,
				station: None,
				week: None,
			},
		),
	];
	let forecast_row = vec![
		ButtonKind::Action(
			"Forecast".to_string(),
			CallbackAction::Forecast {
				farm: None,
				zone: None,
				date: None,
			},
		),
		ButtonKind::Action("Station battery".to_string(), CallbackAction::Battery { farm: None }),
	];

	let mut rows = vec![weather_row, forecast_row];
	if role.can_view_cameras() {
		rows.push(vec![ButtonKind::CameraStatus]);
	}
	if role == Role::Programmer {
		rows.push(vec![ButtonKind::StationStatus]);
	}
	rows.push(vec![ButtonKind::Help]);
	build_keyboard(&rows)
}

/// A one-button-per-farm picker continuing the given drill-down.
pub fn farm_picker(
	farms: &[i32],
	action: impl Fn(FarmId) -> CallbackAction,
) -> InlineKeyboardMarkup {
	let rows: Vec<Vec<ButtonKind>> = farms
		.iter()
		.map(|&id| {
			let farm = FarmId(id);
			vec![ButtonKind::Action(format!("Farm {farm}"), action(farm))]
		})
		.collect();
	build_keyboard(&rows)
}

/// A generic labelled picker, one button per row, plus a main-menu footer.
pub fn picker(entries: Vec<(String, CallbackAction)>) -> InlineKeyboardMarkup {
	let mut rows: Vec<Vec<ButtonKind>> = entries
		.into_iter()
		.map(|(label, action)| vec![ButtonKind::Action(label, action)])
		.collect();
	rows.push(vec![ButtonKind::MainMenu]);
	build_keyboard(&rows)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn programmer_sees_everything() {
		let menu = main_menu(Role::Programmer);
		let labels: Vec<&str> = menu
			.inline_keyboard
			.iter()
			.flatten()
			.map(|b| b.text.as_str())
			.collect();
		assert!(labels.contains(&"Cameras"));
		assert!(labels.contains(&"Weather stations"));
	}

	#[test]
	fn view_role_gets_no_camera_button() {
		let menu = main_menu(Role::View);
		let labels: Vec<&str> = menu
			.inline_keyboard
			.iter()
			.flatten()
			.map(|b| b.text.as_str())
			.collect();
		assert!(!labels.contains(&"Cameras"));
		assert!(labels.contains(&"Current weather"));
	}

	#[test]
	fn security_sees_cameras_but_not_stations() {
		let menu = main_menu(Role::Security);
		let labels: Vec<&str> = menu
			.inline_keyboard
			.iter()
			.flatten()
			.map(|b| b.text.as_str())
			.collect();
		assert!(labels.contains(&"Cameras"));
		assert!(!labels.contains(&"Weather stations"));
	}

	#[test]
	fn farm_picker_encodes_the_farm() {
		let markup = farm_picker(&[3, 7], |farm| CallbackAction::Weather { farm: Some(farm) });
		assert_eq!(markup.inline_keyboard.len(), 2);
		assert_eq!(
			markup.inline_keyboard[0][0].callback_data.as_deref(),
			Some("button:weather,farm:3")
		);
	}
}
