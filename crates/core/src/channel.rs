//! Command and event channel adapters.
//!
//! [`MethodChannel`] decodes [`MethodCall`]s into controller commands and
//! encodes the outcome as a [`MethodResult`]. [`EventChannel`] exposes the
//! controller's event stream to one listener at a time.

use std::sync::Arc;

use checkout_bridge_protocol::{CheckoutEvent, EVENT_CHANNEL, METHOD_CHANNEL, MethodCall, MethodResult, args, methods};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::controller::BridgeController;
use crate::error::BridgeError;
use crate::events::EventMultiplexer;

/// Request/response channel handler.
#[derive(Clone)]
pub struct MethodChannel {
	controller: Arc<BridgeController>,
}

impl MethodChannel {
	pub fn new(controller: Arc<BridgeController>) -> Self {
		Self { controller }
	}

	pub fn name(&self) -> &'static str {
		METHOD_CHANNEL
	}

	/// Handles one call. Unknown methods yield [`MethodResult::NotImplemented`].
	pub fn handle(&self, call: &MethodCall) -> MethodResult {
		debug!(target = "checkout.bridge", method = %call.method, "method call");
		match call.method.as_str() {
			methods::LAUNCH_CHECKOUT => self.launch_checkout(call),
			methods::CLOSE_CHECKOUT => MethodResult::success(self.controller.close().message()),
			_ => MethodResult::NotImplemented,
		}
	}

	fn launch_checkout(&self, call: &MethodCall) -> MethodResult {
		let Some(url) = call.argument::<String>(args::CHECKOUT_URL) else {
			return BridgeError::InvalidArguments("Checkout URL is null".to_string()).into();
		};

		let config = match call.raw_argument(args::CONFIG) {
			None => None,
			Some(Value::Object(bag)) => Some(bag),
			Some(other) => {
				warn!(target = "checkout.bridge", config = %other, "ignoring non-map checkout configuration");
				None
			}
		};

		match self.controller.launch(&url, config) {
			Ok(ack) => MethodResult::success(ack.message()),
			Err(err) => err.into(),
		}
	}
}

/// Push channel handler with a single listener.
#[derive(Clone)]
pub struct EventChannel {
	events: EventMultiplexer,
}

impl EventChannel {
	pub fn new(events: EventMultiplexer) -> Self {
		Self { events }
	}

	pub fn name(&self) -> &'static str {
		EVENT_CHANNEL
	}

	/// Starts listening, replacing any current listener.
	pub fn listen(&self) -> mpsc::UnboundedReceiver<CheckoutEvent> {
		self.events.subscribe()
	}

	/// Stops delivering events.
	pub fn cancel(&self) {
		self.events.unsubscribe();
	}
}
