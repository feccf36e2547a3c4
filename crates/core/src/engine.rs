//! Seam between the bridge and the embedded checkout engine.
//!
//! The engine is a black box with two capabilities: present a checkout for a
//! URL inside a foreground context, and dismiss what it presented. Its
//! configuration is process-wide and engine-owned; [`SharedConfiguration`]
//! models that explicitly with last-writer-wins semantics.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ForegroundContext;
use crate::events::CheckoutEventProcessor;

/// Color scheme variants the engine can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
	Light,
	Dark,
	Web,
	/// Follow the system setting.
	#[default]
	Automatic,
}

/// Preloading capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preloading {
	pub enabled: bool,
}

impl Default for Preloading {
	fn default() -> Self {
		Self { enabled: true }
	}
}

/// Engine configuration. One instance exists per process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
	pub color_scheme: ColorScheme,
	pub preloading: Preloading,
}

/// Process-wide engine configuration cell.
///
/// Clones share the same configuration. Writers replace fields in place and
/// the last writer wins; a launch that configures the engine affects every
/// later presentation until the next write.
#[derive(Debug, Clone, Default)]
pub struct SharedConfiguration {
	inner: Arc<RwLock<EngineConfig>>,
}

impl SharedConfiguration {
	pub fn new(config: EngineConfig) -> Self {
		Self {
			inner: Arc::new(RwLock::new(config)),
		}
	}

	/// Applies `apply` under the write lock.
	pub fn update(&self, apply: &mut dyn FnMut(&mut EngineConfig)) {
		let mut config = self.inner.write();
		apply(&mut *config);
	}

	/// Returns a copy of the current configuration.
	pub fn snapshot(&self) -> EngineConfig {
		self.inner.read().clone()
	}
}

/// Error raised by the engine while presenting.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
	pub message: String,
}

impl EngineError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// A presented checkout. Dropping a sheet abandons it without dismissal.
pub trait CheckoutSheet: Send {
	/// Requests dismissal of the presented checkout.
	fn dismiss(&mut self);
}

/// The embedded checkout engine.
pub trait CheckoutEngine: Send + Sync {
	/// Mutates the process-wide engine configuration.
	fn configure(&self, apply: &mut dyn FnMut(&mut EngineConfig));

	/// Presents a checkout for `url` inside `context`.
	///
	/// Terminal outcomes are reported later, on an engine-owned execution
	/// context, through `processor`.
	fn present(
		&self,
		url: &str,
		context: &dyn ForegroundContext,
		processor: Arc<dyn CheckoutEventProcessor>,
	) -> std::result::Result<Box<dyn CheckoutSheet>, EngineError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_automatic_with_preloading() {
		let config = EngineConfig::default();
		assert_eq!(config.color_scheme, ColorScheme::Automatic);
		assert!(config.preloading.enabled);
	}

	#[test]
	fn shared_configuration_is_last_writer_wins() {
		let shared = SharedConfiguration::default();
		let other = shared.clone();

		shared.update(&mut |config| config.color_scheme = ColorScheme::Dark);
		other.update(&mut |config| config.color_scheme = ColorScheme::Light);

		assert_eq!(shared.snapshot().color_scheme, ColorScheme::Light);
	}
}
