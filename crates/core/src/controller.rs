//! The bridge controller.
//!
//! Owns the single session handle as an explicit state machine:
//!
//! ```text
//! launch: Idle -> Presenting
//! launch: Presenting -> Presenting   (per RelaunchPolicy)
//! close:  Presenting -> Idle         (dismisses the handle)
//! close:  Idle -> Idle               (no-op)
//! ```
//!
//! Host lifecycle notifications only move the [`ContextTracker`]. Terminal
//! engine outcomes do not move the state machine; the host closes the
//! session explicitly. Under [`RelaunchPolicy::Reject`] a session whose
//! engine already reported a terminal outcome counts as `Idle`, so the next
//! launch is accepted without an intervening close.

use std::sync::Arc;

use checkout_bridge_protocol::ConfigBag;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config;
use crate::context::{ContextTracker, ForegroundContext};
use crate::engine::{CheckoutEngine, CheckoutSheet};
use crate::error::{BridgeError, Result};
use crate::events::{EventMultiplexer, SessionProcessor};
use crate::options::{BridgeOptions, RelaunchPolicy};

/// Acknowledgement returned by successful commands.
///
/// `Launched` only means presentation started; the checkout outcome arrives
/// on the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
	Launched,
	Closed,
}

impl Ack {
	pub fn message(self) -> &'static str {
		match self {
			Ack::Launched => "Checkout Launched",
			Ack::Closed => "Checkout Closed",
		}
	}
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
	Idle,
	Presenting,
}

enum SessionState {
	Idle,
	Presenting {
		sheet: Box<dyn CheckoutSheet>,
		processor: Arc<SessionProcessor>,
	},
}

impl SessionState {
	fn phase(&self) -> SessionPhase {
		match self {
			SessionState::Idle => SessionPhase::Idle,
			SessionState::Presenting { .. } => SessionPhase::Presenting,
		}
	}

	fn is_finished(&self) -> bool {
		matches!(self, SessionState::Presenting { processor, .. } if processor.is_finished())
	}
}

/// Accepts commands, owns the session handle, and wires engine outcomes to
/// the event stream.
pub struct BridgeController {
	engine: Arc<dyn CheckoutEngine>,
	options: BridgeOptions,
	contexts: ContextTracker,
	events: EventMultiplexer,
	session: Mutex<SessionState>,
}

impl BridgeController {
	pub fn new(engine: Arc<dyn CheckoutEngine>) -> Self {
		Self::with_options(engine, BridgeOptions::default())
	}

	pub fn with_options(engine: Arc<dyn CheckoutEngine>, options: BridgeOptions) -> Self {
		Self {
			engine,
			options,
			contexts: ContextTracker::new(),
			events: EventMultiplexer::new(),
			session: Mutex::new(SessionState::Idle),
		}
	}

	pub fn options(&self) -> &BridgeOptions {
		&self.options
	}

	/// Outbound event stream shared with the engine processors.
	pub fn events(&self) -> &EventMultiplexer {
		&self.events
	}

	pub fn contexts(&self) -> &ContextTracker {
		&self.contexts
	}

	pub fn phase(&self) -> SessionPhase {
		let mut session = self.session.lock();
		self.release_finished(&mut session);
		session.phase()
	}

	/// Presents a checkout for `url`.
	///
	/// Validation failures leave the session and the engine configuration
	/// untouched. A configuration bag that fails to translate is logged and
	/// ignored. The session lock is held across the engine call, so concurrent
	/// launches and closes are serialized.
	pub fn launch(&self, url: &str, config: Option<&ConfigBag>) -> Result<Ack> {
		if url.is_empty() {
			return Err(BridgeError::InvalidArguments("Checkout URL is empty".to_string()));
		}

		let context = self.presentable_context()?;

		let mut session = self.session.lock();
		self.release_finished(&mut session);
		if session.phase() == SessionPhase::Presenting && self.options.relaunch == RelaunchPolicy::Reject {
			warn!(target = "checkout.bridge", url, "launch rejected: session already presenting");
			return Err(BridgeError::SessionActive);
		}

		if let Some(bag) = config {
			self.apply_configuration(bag);
		}

		let processor = self.events.processor();
		let sheet = self.engine.present(url, context.as_ref(), processor.clone()).map_err(|err| {
			error!(target = "checkout.bridge", url, error = %err, "error launching checkout");
			BridgeError::EngineLaunchFailure { message: err.message }
		})?;

		self.events.activate(processor.generation());
		let previous = std::mem::replace(&mut *session, SessionState::Presenting { sheet, processor });
		drop(session);

		if let SessionState::Presenting { sheet: mut previous, .. } = previous {
			if self.options.relaunch == RelaunchPolicy::DismissPrevious {
				debug!(target = "checkout.bridge", "dismissing previous session");
				previous.dismiss();
			} else {
				warn!(target = "checkout.bridge", "previous session replaced without dismissal");
			}
		}

		info!(target = "checkout.bridge", url, context = context.kind(), "checkout launched");
		Ok(Ack::Launched)
	}

	/// Dismisses the active session, if any. Always succeeds.
	pub fn close(&self) -> Ack {
		let previous = std::mem::replace(&mut *self.session.lock(), SessionState::Idle);
		match previous {
			SessionState::Presenting { mut sheet, .. } => {
				sheet.dismiss();
				info!(target = "checkout.bridge", "checkout closed");
			}
			SessionState::Idle => debug!(target = "checkout.bridge", "close with no active session"),
		}
		Ack::Closed
	}

	pub fn on_context_attached(&self, context: Arc<dyn ForegroundContext>) {
		self.contexts.attach(context);
	}

	pub fn on_context_reattached(&self, context: Arc<dyn ForegroundContext>) {
		self.contexts.attach(context);
	}

	/// Transient detach while the host rebuilds its UI.
	pub fn on_context_detached_for_config_changes(&self) {
		self.contexts.detach();
	}

	/// Permanent detach. Closes the active session only when
	/// [`BridgeOptions::close_on_detach`] is set.
	pub fn on_context_detached(&self) {
		self.contexts.detach();
		if self.options.close_on_detach && self.phase() == SessionPhase::Presenting {
			info!(target = "checkout.bridge", "foreground context gone; closing active session");
			self.close();
		}
	}

	/// Under `Reject`, drops a handle whose presentation already ended so the
	/// host is not locked out until it sends `closeCheckout`.
	fn release_finished(&self, session: &mut SessionState) {
		if self.options.relaunch == RelaunchPolicy::Reject && session.is_finished() {
			debug!(target = "checkout.bridge", "session ended by engine outcome; releasing handle");
			*session = SessionState::Idle;
		}
	}

	fn presentable_context(&self) -> Result<Arc<dyn ForegroundContext>> {
		match self.contexts.current() {
			Some(context) if context.is_presentable() => Ok(context),
			other => {
				let observed = other.map(|context| context.kind().to_string());
				warn!(target = "checkout.bridge", observed = observed.as_deref().unwrap_or("null"), "no presentable foreground context");
				Err(BridgeError::InvalidContext { observed })
			}
		}
	}

	fn apply_configuration(&self, bag: &ConfigBag) {
		match config::translate(bag) {
			Ok(update) => {
				if !update.styling.is_empty() {
					debug!(target = "checkout.bridge", styling = ?update.styling, "styling hints accepted but not applied");
				}
				self.engine.configure(&mut |config| update.apply(config));
			}
			Err(err) => {
				warn!(target = "checkout.bridge", error = %err, "ignoring invalid checkout configuration");
			}
		}
	}
}
