//! Translation of the host's configuration bag into engine configuration.
//!
//! Translation is pure and runs once per launch. Unrecognized color schemes
//! fall back to [`ColorScheme::Automatic`]; only values of the wrong JSON type
//! for `colorScheme` or `preload` are errors, and the controller treats those
//! as "no configuration supplied".

use checkout_bridge_protocol::{ConfigBag, keys};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::engine::{ColorScheme, EngineConfig, Preloading};

/// A bag value had the wrong JSON type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("configuration key `{key}` must be a {expected}, got {found}")]
	InvalidType {
		key: &'static str,
		expected: &'static str,
		found: &'static str,
	},
}

/// Styling keys accepted from the host but not yet applied to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylingHints {
	pub title_bar_background_color: Option<String>,
	pub background_color: Option<String>,
	pub tint_color: Option<String>,
	pub title: Option<String>,
}

impl StylingHints {
	pub fn is_empty(&self) -> bool {
		self.title_bar_background_color.is_none() && self.background_color.is_none() && self.tint_color.is_none() && self.title.is_none()
	}
}

/// Engine configuration changes produced from one bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
	pub color_scheme: ColorScheme,
	/// `None` leaves the engine's current preloading setting untouched.
	pub preloading: Option<Preloading>,
	pub styling: StylingHints,
}

impl ConfigUpdate {
	/// Writes this update into `config`.
	///
	/// Styling hints are intentionally not applied.
	pub fn apply(&self, config: &mut EngineConfig) {
		config.color_scheme = self.color_scheme;
		if let Some(preloading) = self.preloading {
			config.preloading = preloading;
		}
	}
}

/// Translates a configuration bag.
pub fn translate(bag: &ConfigBag) -> Result<ConfigUpdate, ConfigError> {
	for key in bag.keys().filter(|key| !keys::ALL.contains(&key.as_str())) {
		trace!(target = "checkout.bridge", key = %key, "ignoring unknown configuration key");
	}

	let color_scheme = match bag.get(keys::COLOR_SCHEME) {
		None | Some(Value::Null) => ColorScheme::Automatic,
		Some(Value::String(name)) => color_scheme_from_name(name),
		Some(other) => {
			return Err(ConfigError::InvalidType {
				key: keys::COLOR_SCHEME,
				expected: "string",
				found: json_type_name(other),
			});
		}
	};

	let preloading = match bag.get(keys::PRELOAD) {
		None | Some(Value::Null) => None,
		Some(Value::Bool(enabled)) => Some(Preloading { enabled: *enabled }),
		Some(other) => {
			return Err(ConfigError::InvalidType {
				key: keys::PRELOAD,
				expected: "boolean",
				found: json_type_name(other),
			});
		}
	};

	let styling = StylingHints {
		title_bar_background_color: string_value(bag, keys::TITLE_BAR_BACKGROUND_COLOR),
		background_color: string_value(bag, keys::BACKGROUND_COLOR),
		tint_color: string_value(bag, keys::TINT_COLOR),
		title: string_value(bag, keys::TITLE),
	};

	Ok(ConfigUpdate {
		color_scheme,
		preloading,
		styling,
	})
}

/// Case-sensitive scheme lookup.
pub fn color_scheme_from_name(name: &str) -> ColorScheme {
	match name {
		"light" => ColorScheme::Light,
		"dark" => ColorScheme::Dark,
		"web" => ColorScheme::Web,
		_ => ColorScheme::Automatic,
	}
}

fn string_value(bag: &ConfigBag, key: &str) -> Option<String> {
	bag.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
