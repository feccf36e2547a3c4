//! Configuration bag accepted by `launchCheckout`.

use serde_json::{Map, Value};

/// Untyped key/value configuration sent alongside a launch.
///
/// Unknown keys are accepted and ignored so hosts can send newer keys to an
/// older bridge.
pub type ConfigBag = Map<String, Value>;

/// Recognized configuration bag keys.
pub mod keys {
	pub const COLOR_SCHEME: &str = "colorScheme";
	pub const PRELOAD: &str = "preload";
	pub const TITLE_BAR_BACKGROUND_COLOR: &str = "titleBarBackgroundColor";
	pub const BACKGROUND_COLOR: &str = "backgroundColor";
	pub const TINT_COLOR: &str = "tintColor";
	pub const TITLE: &str = "title";

	/// Every key the bridge reads, in the order it reads them.
	pub const ALL: [&str; 6] = [COLOR_SCHEME, PRELOAD, TITLE_BAR_BACKGROUND_COLOR, BACKGROUND_COLOR, TINT_COLOR, TITLE];
}
