//! Command channel requests and results.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method names understood on the command channel.
pub mod methods {
	pub const LAUNCH_CHECKOUT: &str = "launchCheckout";
	pub const CLOSE_CHECKOUT: &str = "closeCheckout";
}

/// Argument names for `launchCheckout`.
pub mod args {
	pub const CHECKOUT_URL: &str = "checkoutUrl";
	pub const CONFIG: &str = "config";
}

/// A single request on the command channel.
///
/// Format:
/// ```json
/// {
///   "method": "launchCheckout",
///   "arguments": { "checkoutUrl": "https://shop.example/checkout", "config": { "colorScheme": "dark" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
	pub method: String,
	#[serde(default)]
	pub arguments: Value,
}

impl MethodCall {
	pub fn new(method: impl Into<String>, arguments: Value) -> Self {
		Self {
			method: method.into(),
			arguments,
		}
	}

	/// Reads a named argument, returning `None` when it is absent, `null`, or
	/// not convertible to `T`.
	pub fn argument<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let value = self.arguments.get(key)?;
		if value.is_null() {
			return None;
		}
		T::deserialize(value).ok()
	}

	/// Returns the raw argument value, if present and not `null`.
	pub fn raw_argument(&self, key: &str) -> Option<&Value> {
		self.arguments.get(key).filter(|value| !value.is_null())
	}
}

/// Result of a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
	Success {
		result: Value,
	},
	Error {
		code: ErrorCode,
		message: String,
		#[serde(default)]
		details: Option<Value>,
	},
	NotImplemented,
}

impl MethodResult {
	pub fn success(result: impl Into<Value>) -> Self {
		MethodResult::Success { result: result.into() }
	}

	pub fn error(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
		MethodResult::Error {
			code,
			message: message.into(),
			details,
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, MethodResult::Success { .. })
	}

	/// Error code for failed calls.
	pub fn error_code(&self) -> Option<ErrorCode> {
		match self {
			MethodResult::Error { code, .. } => Some(*code),
			_ => None,
		}
	}
}

/// Error codes returned on the command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Required argument missing or of the wrong type.
	InvalidArguments,
	/// No presentable foreground context is attached.
	InvalidContext,
	/// The engine raised an error while presenting.
	CheckoutError,
	/// A launch was rejected because a session is already presenting.
	SessionActive,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::InvalidArguments => write!(f, "INVALID_ARGUMENTS"),
			ErrorCode::InvalidContext => write!(f, "INVALID_CONTEXT"),
			ErrorCode::CheckoutError => write!(f, "CHECKOUT_ERROR"),
			ErrorCode::SessionActive => write!(f, "SESSION_ACTIVE"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn method_call_without_arguments_deserializes() {
		let call: MethodCall = serde_json::from_str(r#"{"method": "closeCheckout"}"#).unwrap();
		assert_eq!(call.method, methods::CLOSE_CHECKOUT);
		assert!(call.arguments.is_null());
		assert_eq!(call.argument::<String>(args::CHECKOUT_URL), None);
	}

	#[test]
	fn argument_rejects_wrong_type() {
		let call = MethodCall::new(methods::LAUNCH_CHECKOUT, json!({"checkoutUrl": 42}));
		assert_eq!(call.argument::<String>(args::CHECKOUT_URL), None);
		assert_eq!(call.raw_argument(args::CHECKOUT_URL), Some(&json!(42)));
	}

	#[test]
	fn null_argument_reads_as_absent() {
		let call = MethodCall::new(methods::LAUNCH_CHECKOUT, json!({"checkoutUrl": "https://a.example", "config": null}));
		assert_eq!(call.argument::<String>(args::CHECKOUT_URL).as_deref(), Some("https://a.example"));
		assert!(call.raw_argument(args::CONFIG).is_none());
	}

	#[test]
	fn error_result_wire_shape() {
		let result = MethodResult::error(ErrorCode::InvalidContext, "no context", Some(json!({"observedContext": null})));
		let value = serde_json::to_value(&result).unwrap();
		assert_eq!(value["status"], "error");
		assert_eq!(value["code"], "INVALID_CONTEXT");
		assert_eq!(value["details"]["observedContext"], Value::Null);
		assert_eq!(result.error_code(), Some(ErrorCode::InvalidContext));
	}

	#[test]
	fn not_implemented_wire_shape() {
		let value = serde_json::to_value(MethodResult::NotImplemented).unwrap();
		assert_eq!(value, json!({"status": "not_implemented"}));
	}

	#[test]
	fn error_code_display_matches_wire() {
		for code in [ErrorCode::InvalidArguments, ErrorCode::InvalidContext, ErrorCode::CheckoutError, ErrorCode::SessionActive] {
			let wire = serde_json::to_value(code).unwrap();
			assert_eq!(wire, Value::String(code.to_string()));
		}
	}
}
