//! Engine outcome delivery.
//!
//! The engine reports three terminal outcomes. They are modelled as one
//! tagged union, [`CheckoutOutcome`], and funnelled through an
//! [`EventMultiplexer`] into a single ordered stream of [`CheckoutEvent`]s.
//!
//! The multiplexer has exactly one subscriber slot and no buffer. An outcome
//! that fires while the slot is empty is dropped and is never replayed to a
//! later subscriber.
//!
//! Each presentation gets its own [`SessionProcessor`] tagged with a
//! generation. Once the controller activates a newer generation, outcomes
//! from older processors (for example a `canceled` fired when a replaced
//! sheet is dismissed) no longer reach the subscriber.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use checkout_bridge_protocol::CheckoutEvent;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Completion details reported by the engine.
///
/// The payload is not forwarded on the event channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutCompleted {
	pub payload: Value,
}

/// Failure reported by the engine after presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFailure {
	pub message: String,
}

impl CheckoutFailure {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Terminal outcome of a presented checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
	Canceled,
	Completed(CheckoutCompleted),
	Failed(CheckoutFailure),
}

impl From<&CheckoutOutcome> for CheckoutEvent {
	fn from(outcome: &CheckoutOutcome) -> Self {
		match outcome {
			CheckoutOutcome::Canceled => CheckoutEvent::canceled(),
			CheckoutOutcome::Completed(_) => CheckoutEvent::completed(),
			CheckoutOutcome::Failed(failure) => CheckoutEvent::failed(failure.message.clone()),
		}
	}
}

/// Receiver of engine outcomes, handed to [`CheckoutEngine::present`].
///
/// [`CheckoutEngine::present`]: crate::engine::CheckoutEngine::present
pub trait CheckoutEventProcessor: Send + Sync {
	fn on_outcome(&self, outcome: CheckoutOutcome);

	fn on_canceled(&self) {
		self.on_outcome(CheckoutOutcome::Canceled);
	}

	fn on_completed(&self, event: CheckoutCompleted) {
		self.on_outcome(CheckoutOutcome::Completed(event));
	}

	fn on_failed(&self, failure: CheckoutFailure) {
		self.on_outcome(CheckoutOutcome::Failed(failure));
	}
}

type Subscriber = mpsc::UnboundedSender<CheckoutEvent>;

#[derive(Debug)]
struct Shared {
	slot: Mutex<Option<Subscriber>>,
	next_generation: AtomicU64,
	/// Generation of the session currently held by the controller; outcomes
	/// from older generations are dropped.
	active_generation: AtomicU64,
}

impl Default for Shared {
	fn default() -> Self {
		Self {
			slot: Mutex::new(None),
			next_generation: AtomicU64::new(1),
			active_generation: AtomicU64::new(0),
		}
	}
}

/// Single-subscriber, unbuffered event stream.
///
/// Clones share the same subscriber slot and generation counters.
#[derive(Debug, Clone, Default)]
pub struct EventMultiplexer {
	shared: Arc<Shared>,
}

impl EventMultiplexer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs a new subscriber, replacing any previous one.
	///
	/// A replaced subscriber's receiver sees the stream end.
	pub fn subscribe(&self) -> mpsc::UnboundedReceiver<CheckoutEvent> {
		let (tx, rx) = mpsc::unbounded_channel();
		if self.shared.slot.lock().replace(tx).is_some() {
			debug!(target = "checkout.events", "event subscriber replaced");
		} else {
			debug!(target = "checkout.events", "event subscriber installed");
		}
		rx
	}

	/// Clears the subscriber slot.
	pub fn unsubscribe(&self) {
		if self.shared.slot.lock().take().is_some() {
			debug!(target = "checkout.events", "event subscriber removed");
		}
	}

	pub fn has_subscriber(&self) -> bool {
		self.shared.slot.lock().as_ref().is_some_and(|tx| !tx.is_closed())
	}

	/// Delivers `outcome` to the current subscriber.
	///
	/// Returns `false` when the outcome was dropped.
	pub fn emit(&self, outcome: &CheckoutOutcome) -> bool {
		let event = CheckoutEvent::from(outcome);
		let mut slot = self.shared.slot.lock();
		let Some(tx) = slot.as_ref() else {
			trace!(target = "checkout.events", event = %event.event, "no subscriber; event dropped");
			return false;
		};

		if tx.send(event).is_err() {
			debug!(target = "checkout.events", "event subscriber went away; slot cleared");
			*slot = None;
			return false;
		}
		true
	}

	/// Returns a fresh engine-facing processor with its own generation.
	pub fn processor(&self) -> Arc<SessionProcessor> {
		let generation = self.shared.next_generation.fetch_add(1, Ordering::SeqCst);
		Arc::new(SessionProcessor {
			generation,
			finished: AtomicBool::new(false),
			events: self.clone(),
		})
	}

	/// Marks `generation` as the held session. Processors of earlier
	/// generations stop reaching the subscriber.
	pub fn activate(&self, generation: u64) {
		self.shared.active_generation.fetch_max(generation, Ordering::SeqCst);
	}

	pub fn is_superseded(&self, generation: u64) -> bool {
		generation < self.shared.active_generation.load(Ordering::SeqCst)
	}

	fn emit_from(&self, generation: u64, outcome: &CheckoutOutcome) -> bool {
		if self.is_superseded(generation) {
			debug!(target = "checkout.events", generation, outcome = ?outcome, "outcome from replaced session dropped");
			return false;
		}
		self.emit(outcome)
	}
}

/// Processor handed to the engine for one presentation.
#[derive(Debug)]
pub struct SessionProcessor {
	generation: u64,
	finished: AtomicBool,
	events: EventMultiplexer,
}

impl SessionProcessor {
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether the engine has reported a terminal outcome for this presentation.
	pub fn is_finished(&self) -> bool {
		self.finished.load(Ordering::SeqCst)
	}
}

impl CheckoutEventProcessor for SessionProcessor {
	fn on_outcome(&self, outcome: CheckoutOutcome) {
		debug!(target = "checkout.events", generation = self.generation, outcome = ?outcome, "engine reported outcome");
		self.finished.store(true, Ordering::SeqCst);
		self.events.emit_from(self.generation, &outcome);
	}
}
