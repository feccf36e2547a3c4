//! Bridge behavior options.

use serde::{Deserialize, Serialize};

/// What `launch` does while a session is already presenting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaunchPolicy {
	/// Keep the new handle and abandon the old one without dismissing it.
	#[default]
	Replace,
	/// Fail the launch with [`BridgeError::SessionActive`](crate::BridgeError::SessionActive).
	Reject,
	/// Dismiss the old handle once the new presentation succeeds.
	DismissPrevious,
}

/// Options for a [`BridgeController`](crate::BridgeController).
///
/// ```json
/// { "relaunch": "dismiss_previous", "close_on_detach": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
	pub relaunch: RelaunchPolicy,
	/// Close the active session when the host permanently detaches its
	/// foreground context. Detaches for configuration changes never close.
	pub close_on_detach: bool,
}

impl BridgeOptions {
	pub fn with_relaunch(mut self, relaunch: RelaunchPolicy) -> Self {
		self.relaunch = relaunch;
		self
	}

	pub fn with_close_on_detach(mut self, close_on_detach: bool) -> Self {
		self.close_on_detach = close_on_detach;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_yields_defaults() {
		let options: BridgeOptions = serde_json::from_str("{}").unwrap();
		assert_eq!(options, BridgeOptions::default());
		assert_eq!(options.relaunch, RelaunchPolicy::Replace);
		assert!(!options.close_on_detach);
	}

	#[test]
	fn parses_snake_case_policy() {
		let options: BridgeOptions = serde_json::from_str(r#"{"relaunch": "dismiss_previous", "close_on_detach": true}"#).unwrap();
		assert_eq!(options.relaunch, RelaunchPolicy::DismissPrevious);
		assert!(options.close_on_detach);
	}

	#[test]
	fn rejects_unknown_policy() {
		assert!(serde_json::from_str::<BridgeOptions>(r#"{"relaunch": "queue"}"#).is_err());
	}
}
