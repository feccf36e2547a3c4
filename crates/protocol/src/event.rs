//! Event channel payloads.

use serde::{Deserialize, Serialize};

/// Terminal outcome kind reported on the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Canceled,
	Completed,
	Failed,
}

impl EventKind {
	pub fn as_str(self) -> &'static str {
		match self {
			EventKind::Canceled => "canceled",
			EventKind::Completed => "completed",
			EventKind::Failed => "failed",
		}
	}
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Message pushed to the event channel listener.
///
/// Serializes as `{"event": "failed", "error": "network timeout"}`. The
/// `error` field is always present and is `null` unless `event` is `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutEvent {
	pub event: EventKind,
	#[serde(default)]
	pub error: Option<String>,
}

impl CheckoutEvent {
	pub fn canceled() -> Self {
		Self {
			event: EventKind::Canceled,
			error: None,
		}
	}

	pub fn completed() -> Self {
		Self {
			event: EventKind::Completed,
			error: None,
		}
	}

	pub fn failed(message: impl Into<String>) -> Self {
		Self {
			event: EventKind::Failed,
			error: Some(message.into()),
		}
	}
}
