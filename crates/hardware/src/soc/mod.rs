//! Coherence boundary.
//!
//! This module holds everything a cache needs to talk to the coherence protocol
//! attached to it: the gateway trait, the notification mailbox, and a trivial
//! always-grant protocol.

/// Notification types, the notifier mailbox and the immediate-grant gateway.
pub mod coherence;

/// Coherence gateway trait definition.
pub mod traits;

pub use coherence::{CoherenceEvent, CoherenceEventKind, CoherenceNotifier, ImmediateGrant};
pub use traits::CoherenceGateway;
