//! Host foreground context tracking.
//!
//! The tracker only stores what the host last told it. Attaching or
//! detaching a context never touches the active session.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// The host's current UI attachment point.
pub trait ForegroundContext: Send + Sync + fmt::Debug {
	/// Diagnostic type name of this context, reported when it cannot present.
	fn kind(&self) -> &str;

	/// Whether the engine can present inside this context.
	fn is_presentable(&self) -> bool;
}

/// Plain foreground context described by a kind name and a presentable flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
	kind: String,
	presentable: bool,
}

impl HostContext {
	pub fn new(kind: impl Into<String>, presentable: bool) -> Self {
		Self {
			kind: kind.into(),
			presentable,
		}
	}

	pub fn presentable(kind: impl Into<String>) -> Self {
		Self::new(kind, true)
	}
}

impl ForegroundContext for HostContext {
	fn kind(&self) -> &str {
		&self.kind
	}

	fn is_presentable(&self) -> bool {
		self.presentable
	}
}

/// Holder for the current foreground context.
#[derive(Debug, Default)]
pub struct ContextTracker {
	current: RwLock<Option<Arc<dyn ForegroundContext>>>,
}

impl ContextTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `context` as current, replacing any previous one.
	pub fn attach(&self, context: Arc<dyn ForegroundContext>) {
		debug!(target = "checkout.context", kind = context.kind(), "foreground context attached");
		*self.current.write() = Some(context);
	}

	/// Clears the current context.
	pub fn detach(&self) {
		if self.current.write().take().is_some() {
			debug!(target = "checkout.context", "foreground context detached");
		}
	}

	/// Returns the current context, if any.
	pub fn current(&self) -> Option<Arc<dyn ForegroundContext>> {
		self.current.read().clone()
	}

	pub fn is_attached(&self) -> bool {
		self.current.read().is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_detached() {
		let tracker = ContextTracker::new();
		assert!(tracker.current().is_none());
		assert!(!tracker.is_attached());
	}

	#[test]
	fn attach_replaces_and_detach_clears() {
		let tracker = ContextTracker::new();
		tracker.attach(Arc::new(HostContext::presentable("MainActivity")));
		tracker.attach(Arc::new(HostContext::new("SettingsActivity", false)));

		let current = tracker.current().unwrap();
		assert_eq!(current.kind(), "SettingsActivity");
		assert!(!current.is_presentable());

		tracker.detach();
		assert!(tracker.current().is_none());

		tracker.detach();
		assert!(!tracker.is_attached());
	}

	#[test]
	fn writes_are_visible_across_threads() {
		let tracker = Arc::new(ContextTracker::new());
		let writer = Arc::clone(&tracker);
		std::thread::spawn(move || writer.attach(Arc::new(HostContext::presentable("MainActivity"))))
			.join()
			.unwrap();

		assert_eq!(tracker.current().unwrap().kind(), "MainActivity");
	}
}
