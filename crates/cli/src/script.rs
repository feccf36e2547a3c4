//! NDJSON host script format.
//!
//! Each stdin line is one [`HostAction`]; each stdout line is one
//! [`HostOutput`].

use checkout_bridge_protocol::{CheckoutEvent, EventKind, MethodResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_presentable() -> bool {
	true
}

/// Something the host (or the simulated engine) does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostAction {
	/// Command channel request.
	Call {
		method: String,
		#[serde(default)]
		arguments: Value,
	},
	Attach {
		kind: String,
		#[serde(default = "default_presentable")]
		presentable: bool,
	},
	Reattach {
		kind: String,
		#[serde(default = "default_presentable")]
		presentable: bool,
	},
	Detach,
	DetachForConfigChanges,
	/// Event channel onListen.
	Listen,
	/// Event channel onCancel.
	Cancel,
	/// Engine reports a terminal outcome for the latest presentation.
	Engine {
		outcome: EventKind,
		#[serde(default)]
		message: Option<String>,
		#[serde(default)]
		payload: Value,
	},
	/// Makes later presentations fail with `message`; `null` restores success.
	FailPresentations {
		#[serde(default)]
		message: Option<String>,
	},
}

/// A line written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostOutput {
	Reply { method: String, result: MethodResult },
	Event(CheckoutEvent),
	InvalidLine { message: String },
}
