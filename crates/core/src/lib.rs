//! Session bridge between a host application and an embedded checkout engine.
//!
//! The host drives the bridge through two commands, `launchCheckout` and
//! `closeCheckout`, and observes terminal outcomes on a separate event
//! stream. The bridge owns at most one presented session at a time, tracks
//! the host's foreground context, and translates the host's untyped
//! configuration bag into the engine's process-wide configuration.
//!
//! # Components
//!
//! * [`config`]: configuration bag translation
//! * [`context`]: foreground context tracking
//! * [`events`]: engine outcomes multiplexed into one event stream
//! * [`controller`]: the session state machine and command handling
//! * [`channel`]: wire adapters for the command and event channels
//! * [`engine`]: the seam to the embedded engine
//!
//! # Example
//!
//! ```ignore
//! let controller = Arc::new(BridgeController::new(engine));
//! let methods = MethodChannel::new(Arc::clone(&controller));
//! let mut events = EventChannel::new(controller.events().clone()).listen();
//!
//! controller.on_context_attached(context);
//! let result = methods.handle(&MethodCall::new("launchCheckout", json!({"checkoutUrl": url})));
//! while let Some(event) = events.recv().await { /* ... */ }
//! ```

pub mod channel;
pub mod config;
pub mod context;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod fake_engine;
pub mod options;

pub use channel::{EventChannel, MethodChannel};
pub use config::{ConfigError, ConfigUpdate, StylingHints, translate};
pub use context::{ContextTracker, ForegroundContext, HostContext};
pub use controller::{Ack, BridgeController, SessionPhase};
pub use engine::{CheckoutEngine, CheckoutSheet, ColorScheme, EngineConfig, EngineError, Preloading, SharedConfiguration};
pub use error::{BridgeError, Result};
pub use events::{CheckoutCompleted, CheckoutEventProcessor, CheckoutFailure, CheckoutOutcome, EventMultiplexer, SessionProcessor};
pub use options::{BridgeOptions, RelaunchPolicy};

pub use checkout_bridge_protocol as protocol;
