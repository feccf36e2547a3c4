//! Error types surfaced to command callers.

use checkout_bridge_protocol::{ErrorCode, MethodResult};
use serde_json::{Value, json};
use thiserror::Error;

/// Result alias used by bridge commands.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failures reported synchronously on the command channel.
///
/// Only precondition and presentation failures are errors. Terminal outcomes
/// of a presented session travel on the event channel instead.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// A required argument was missing, empty, or of the wrong type.
	#[error("{0}")]
	InvalidArguments(String),

	/// No presentable foreground context is attached.
	///
	/// `observed` names the kind of context that was attached, if any.
	#[error("Foreground context is not presentable. Actual: {}", .observed.as_deref().unwrap_or("null"))]
	InvalidContext { observed: Option<String> },

	/// The engine raised an error while presenting.
	#[error("Error launching checkout: {message}")]
	EngineLaunchFailure { message: String },

	/// A launch arrived while a session is presenting and the relaunch policy rejects it.
	#[error("A checkout session is already presenting")]
	SessionActive,
}

impl BridgeError {
	/// Wire code for this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			BridgeError::InvalidArguments(_) => ErrorCode::InvalidArguments,
			BridgeError::InvalidContext { .. } => ErrorCode::InvalidContext,
			BridgeError::EngineLaunchFailure { .. } => ErrorCode::CheckoutError,
			BridgeError::SessionActive => ErrorCode::SessionActive,
		}
	}

	/// Human-readable message sent on the wire.
	pub fn wire_message(&self) -> String {
		match self {
			BridgeError::EngineLaunchFailure { .. } => "Error launching checkout".to_string(),
			other => other.to_string(),
		}
	}

	/// Structured details sent on the wire.
	pub fn details(&self) -> Option<Value> {
		match self {
			BridgeError::InvalidContext { observed } => Some(json!({ "observedContext": observed })),
			BridgeError::EngineLaunchFailure { message } => Some(Value::String(message.clone())),
			BridgeError::InvalidArguments(_) | BridgeError::SessionActive => None,
		}
	}
}

impl From<BridgeError> for MethodResult {
	fn from(err: BridgeError) -> Self {
		MethodResult::error(err.code(), err.wire_message(), err.details())
	}
}
