//! Wire types for the checkout bridge.
//!
//! This crate contains the serde-serializable types exchanged between a host
//! and the bridge: method calls on the command channel, their results, and
//! the payloads pushed on the event channel.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * Host-agnostic: Field names match what host callers already send
//! * Stable: Changes only when the wire shape changes
//!
//! Session semantics live in `checkout-bridge`.

pub mod config;
pub mod event;
pub mod method;

pub use config::*;
pub use event::*;
pub use method::*;

/// Name of the request/response channel carrying [`MethodCall`]s.
pub const METHOD_CHANNEL: &str = "checkout_sheet";

/// Name of the push channel carrying [`CheckoutEvent`]s.
pub const EVENT_CHANNEL: &str = "checkout_sheet_events";
