//! Scripted host wired to the bridge and a fake engine.

use std::sync::Arc;

use checkout_bridge::fake_engine::{FakeEngineBuilder, FakeEngineController};
use checkout_bridge::protocol::{CheckoutEvent, EventKind, MethodCall};
use checkout_bridge::{BridgeController, BridgeOptions, EventChannel, HostContext, MethodChannel};
use tokio::sync::mpsc;
use tracing::debug;

use crate::script::{HostAction, HostOutput};

/// Applies host actions and collects what the host would observe.
///
/// Events are pushed synchronously by the fake engine, so draining the
/// listener after each action yields replies and events in causal order.
pub struct ScriptedHost {
	controller: Arc<BridgeController>,
	methods: MethodChannel,
	events: EventChannel,
	engine: FakeEngineController,
	listener: Option<mpsc::UnboundedReceiver<CheckoutEvent>>,
}

impl ScriptedHost {
	pub fn new(options: BridgeOptions) -> Self {
		let (engine, fake) = FakeEngineBuilder::new().build();
		let controller = Arc::new(BridgeController::with_options(Arc::new(engine), options));
		Self {
			methods: MethodChannel::new(Arc::clone(&controller)),
			events: EventChannel::new(controller.events().clone()),
			controller,
			engine: fake,
			listener: None,
		}
	}

	pub fn options(&self) -> &BridgeOptions {
		self.controller.options()
	}

	/// Parses and applies one NDJSON line. Blank lines produce nothing.
	pub fn handle_line(&mut self, line: &str) -> Vec<HostOutput> {
		let line = line.trim();
		if line.is_empty() {
			return Vec::new();
		}

		match serde_json::from_str::<HostAction>(line) {
			Ok(action) => self.apply(action),
			Err(err) => vec![HostOutput::InvalidLine { message: err.to_string() }],
		}
	}

	pub fn apply(&mut self, action: HostAction) -> Vec<HostOutput> {
		let mut out = Vec::new();
		match action {
			HostAction::Call { method, arguments } => {
				let call = MethodCall::new(method, arguments);
				let result = self.methods.handle(&call);
				out.push(HostOutput::Reply { method: call.method, result });
			}
			HostAction::Attach { kind, presentable } => {
				self.controller.on_context_attached(Arc::new(HostContext::new(kind, presentable)));
			}
			HostAction::Reattach { kind, presentable } => {
				self.controller.on_context_reattached(Arc::new(HostContext::new(kind, presentable)));
			}
			HostAction::Detach => self.controller.on_context_detached(),
			HostAction::DetachForConfigChanges => self.controller.on_context_detached_for_config_changes(),
			HostAction::Listen => {
				self.drain(&mut out);
				self.listener = Some(self.events.listen());
			}
			HostAction::Cancel => {
				self.drain(&mut out);
				self.events.cancel();
				self.listener = None;
			}
			HostAction::Engine { outcome, message, payload } => {
				let delivered = match outcome {
					EventKind::Canceled => self.engine.cancel(),
					EventKind::Completed => self.engine.complete(payload),
					EventKind::Failed => self.engine.fail(message.unwrap_or_default()),
				};
				if !delivered {
					debug!(target = "checkout.host", %outcome, "engine outcome with nothing presented");
				}
			}
			HostAction::FailPresentations { message } => match message {
				Some(message) => self.engine.fail_presentations(message),
				None => self.engine.succeed_presentations(),
			},
		}
		self.drain(&mut out);
		out
	}

	/// Starts listening without going through a script line.
	pub fn listen(&mut self) {
		self.listener = Some(self.events.listen());
	}

	fn drain(&mut self, out: &mut Vec<HostOutput>) {
		let Some(listener) = self.listener.as_mut() else {
			return;
		};
		while let Ok(event) = listener.try_recv() {
			out.push(HostOutput::Event(event));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use checkout_bridge::RelaunchPolicy;
	use checkout_bridge::protocol::{ErrorCode, MethodResult};

	fn lines(host: &mut ScriptedHost, script: &[&str]) -> Vec<HostOutput> {
		script.iter().flat_map(|line| host.handle_line(line)).collect()
	}

	#[test]
	fn launch_then_fail_emits_reply_and_event() {
		let mut host = ScriptedHost::new(BridgeOptions::default());
		let out = lines(
			&mut host,
			&[
				r#"{"type":"attach","kind":"MainActivity"}"#,
				r#"{"type":"listen"}"#,
				r#"{"type":"call","method":"launchCheckout","arguments":{"checkoutUrl":"https://shop.example/checkout"}}"#,
				r#"{"type":"engine","outcome":"failed","message":"network timeout"}"#,
			],
		);

		assert_eq!(
			out,
			vec![
				HostOutput::Reply {
					method: "launchCheckout".to_string(),
					result: MethodResult::success("Checkout Launched"),
				},
				HostOutput::Event(CheckoutEvent::failed("network timeout")),
			]
		);
	}

	#[test]
	fn events_before_listen_are_dropped() {
		let mut host = ScriptedHost::new(BridgeOptions::default());
		let out = lines(
			&mut host,
			&[
				r#"{"type":"attach","kind":"MainActivity"}"#,
				r#"{"type":"call","method":"launchCheckout","arguments":{"checkoutUrl":"https://a.example"}}"#,
				r#"{"type":"engine","outcome":"canceled"}"#,
				r#"{"type":"listen"}"#,
				r#"{"type":"engine","outcome":"completed"}"#,
				r#"{"type":"cancel"}"#,
				r#"{"type":"engine","outcome":"canceled"}"#,
			],
		);

		let events: Vec<_> = out.into_iter().filter(|o| matches!(o, HostOutput::Event(_))).collect();
		assert_eq!(events, vec![HostOutput::Event(CheckoutEvent::completed())]);
	}

	#[test]
	fn failing_presentation_reports_checkout_error() {
		let mut host = ScriptedHost::new(BridgeOptions::default());
		let out = lines(
			&mut host,
			&[
				r#"{"type":"attach","kind":"MainActivity"}"#,
				r#"{"type":"fail_presentations","message":"no webview"}"#,
				r#"{"type":"call","method":"launchCheckout","arguments":{"checkoutUrl":"https://a.example"}}"#,
			],
		);

		match &out[..] {
			[HostOutput::Reply { result, .. }] => assert_eq!(result.error_code(), Some(ErrorCode::CheckoutError)),
			other => panic!("unexpected output {other:?}"),
		}
	}

	#[test]
	fn reject_host_relaunches_after_engine_cancel() {
		let mut host = ScriptedHost::new(BridgeOptions::default().with_relaunch(RelaunchPolicy::Reject));
		assert_eq!(host.options().relaunch, RelaunchPolicy::Reject);

		let out = lines(
			&mut host,
			&[
				r#"{"type":"attach","kind":"MainActivity"}"#,
				r#"{"type":"call","method":"launchCheckout","arguments":{"checkoutUrl":"https://a.example"}}"#,
				r#"{"type":"engine","outcome":"canceled"}"#,
				r#"{"type":"call","method":"launchCheckout","arguments":{"checkoutUrl":"https://b.example"}}"#,
			],
		);

		let launched = HostOutput::Reply {
			method: "launchCheckout".to_string(),
			result: MethodResult::success("Checkout Launched"),
		};
		assert_eq!(out, vec![launched.clone(), launched]);
	}

	#[test]
	fn invalid_lines_are_reported_and_blank_lines_skipped() {
		let mut host = ScriptedHost::new(BridgeOptions::default());
		assert!(host.handle_line("   ").is_empty());
		assert!(matches!(&host.handle_line("{nope")[..], [HostOutput::InvalidLine { .. }]));
		assert!(matches!(&host.handle_line(r#"{"type":"teleport"}"#)[..], [HostOutput::InvalidLine { .. }]));
	}
}
