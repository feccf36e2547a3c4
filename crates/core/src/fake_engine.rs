//! In-memory checkout engine for exercising the bridge without a real engine.
//!
//! # Example
//!
//! ```ignore
//! let (engine, fake) = FakeEngineBuilder::new().build();
//! let controller = BridgeController::new(Arc::new(engine));
//!
//! controller.on_context_attached(Arc::new(HostContext::presentable("MainActivity")));
//! controller.launch("https://shop.example/checkout", None)?;
//!
//! fake.fail("network timeout");
//! assert_eq!(fake.presentations().len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::context::ForegroundContext;
use crate::engine::{CheckoutEngine, CheckoutSheet, EngineConfig, EngineError, SharedConfiguration};
use crate::events::{CheckoutCompleted, CheckoutEventProcessor, CheckoutFailure, CheckoutOutcome};

/// Builder for creating fake engine instances.
#[derive(Debug, Default)]
pub struct FakeEngineBuilder {
	initial: EngineConfig,
	fail_with: Option<String>,
	cancel_on_dismiss: bool,
}

impl FakeEngineBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts the engine with `config` instead of the defaults.
	pub fn configuration(mut self, config: EngineConfig) -> Self {
		self.initial = config;
		self
	}

	/// Makes every presentation fail with `message`.
	pub fn fail_presentations(mut self, message: impl Into<String>) -> Self {
		self.fail_with = Some(message.into());
		self
	}

	/// Makes dismissed sheets report a cancellation through their processor,
	/// the way a real sheet does when it is torn down.
	pub fn cancel_on_dismiss(mut self) -> Self {
		self.cancel_on_dismiss = true;
		self
	}

	/// Builds the engine and a controller for scripting and inspecting it.
	pub fn build(self) -> (FakeEngine, FakeEngineController) {
		let state = Arc::new(Mutex::new(FakeState {
			fail_with: self.fail_with,
			cancel_on_dismiss: self.cancel_on_dismiss,
			..FakeState::default()
		}));
		let configuration = SharedConfiguration::new(self.initial);

		let engine = FakeEngine {
			state: Arc::clone(&state),
			configuration: configuration.clone(),
		};
		let controller = FakeEngineController { state, configuration };
		(engine, controller)
	}
}

/// One recorded `present` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
	pub sheet_id: u64,
	pub url: String,
	pub context_kind: String,
	/// Engine configuration in effect when the presentation started.
	pub configuration: EngineConfig,
}

#[derive(Default)]
struct FakeState {
	next_sheet_id: u64,
	fail_with: Option<String>,
	presentations: Vec<Presentation>,
	dismissed: Vec<u64>,
	configure_calls: usize,
	cancel_on_dismiss: bool,
	processors: HashMap<u64, Arc<dyn CheckoutEventProcessor>>,
	latest: Option<u64>,
}

/// Fake [`CheckoutEngine`].
pub struct FakeEngine {
	state: Arc<Mutex<FakeState>>,
	configuration: SharedConfiguration,
}

impl CheckoutEngine for FakeEngine {
	fn configure(&self, apply: &mut dyn FnMut(&mut EngineConfig)) {
		self.state.lock().configure_calls += 1;
		self.configuration.update(apply);
	}

	fn present(
		&self,
		url: &str,
		context: &dyn ForegroundContext,
		processor: Arc<dyn CheckoutEventProcessor>,
	) -> Result<Box<dyn CheckoutSheet>, EngineError> {
		let mut state = self.state.lock();
		if let Some(message) = &state.fail_with {
			return Err(EngineError::new(message.clone()));
		}

		let sheet_id = state.next_sheet_id;
		state.next_sheet_id += 1;
		state.presentations.push(Presentation {
			sheet_id,
			url: url.to_string(),
			context_kind: context.kind().to_string(),
			configuration: self.configuration.snapshot(),
		});
		state.processors.insert(sheet_id, Arc::clone(&processor));
		state.latest = Some(sheet_id);

		Ok(Box::new(FakeSheet {
			id: sheet_id,
			state: Arc::clone(&self.state),
			processor,
		}))
	}
}

struct FakeSheet {
	id: u64,
	state: Arc<Mutex<FakeState>>,
	processor: Arc<dyn CheckoutEventProcessor>,
}

impl CheckoutSheet for FakeSheet {
	fn dismiss(&mut self) {
		let cancel = {
			let mut state = self.state.lock();
			state.dismissed.push(self.id);
			state.cancel_on_dismiss
		};
		if cancel {
			self.processor.on_canceled();
		}
	}
}

/// Controller for scripting outcomes and inspecting engine calls.
#[derive(Clone)]
pub struct FakeEngineController {
	state: Arc<Mutex<FakeState>>,
	configuration: SharedConfiguration,
}

impl FakeEngineController {
	/// Makes subsequent presentations fail with `message`.
	pub fn fail_presentations(&self, message: impl Into<String>) {
		self.state.lock().fail_with = Some(message.into());
	}

	/// Lets subsequent presentations succeed again.
	pub fn succeed_presentations(&self) {
		self.state.lock().fail_with = None;
	}

	/// Reports `outcome` through the processor of the latest presentation.
	///
	/// Returns `false` when nothing has been presented yet.
	pub fn emit(&self, outcome: CheckoutOutcome) -> bool {
		let latest = self.state.lock().latest;
		match latest {
			Some(sheet_id) => self.emit_to(sheet_id, outcome),
			None => false,
		}
	}

	/// Reports `outcome` through the processor handed to presentation
	/// `sheet_id`, even if later presentations exist.
	///
	/// Returns `false` for an unknown sheet.
	pub fn emit_to(&self, sheet_id: u64, outcome: CheckoutOutcome) -> bool {
		// Release the engine lock before calling out.
		let processor = self.state.lock().processors.get(&sheet_id).cloned();
		match processor {
			Some(processor) => {
				processor.on_outcome(outcome);
				true
			}
			None => false,
		}
	}

	pub fn cancel(&self) -> bool {
		self.emit(CheckoutOutcome::Canceled)
	}

	pub fn complete(&self, payload: Value) -> bool {
		self.emit(CheckoutOutcome::Completed(CheckoutCompleted { payload }))
	}

	pub fn fail(&self, message: impl Into<String>) -> bool {
		self.emit(CheckoutOutcome::Failed(CheckoutFailure::new(message)))
	}

	pub fn presentations(&self) -> Vec<Presentation> {
		self.state.lock().presentations.clone()
	}

	/// Sheet ids dismissed so far, in dismissal order.
	pub fn dismissed(&self) -> Vec<u64> {
		self.state.lock().dismissed.clone()
	}

	pub fn configure_calls(&self) -> usize {
		self.state.lock().configure_calls
	}

	/// Current process-wide engine configuration.
	pub fn configuration(&self) -> EngineConfig {
		self.configuration.snapshot()
	}
}
