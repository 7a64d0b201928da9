//! Coherence gateway trait.
//!
//! This module defines the boundary between a cache and the coherence protocol
//! plugged in behind it. It provides:
//! 1. **Permission:** A synchronous query asking whether a processor may complete
//!    an access to a block right now.
//! 2. **Notification:** Registration of the [`CoherenceNotifier`] through which the
//!    protocol later reports that data for a denied request has arrived.
//! 3. **Lifecycle:** A `tick` forwarded once per cache tick.
//!
//! The protocol's own state machine (MESI, MSI, directory, ...) lives entirely behind
//! this trait.

use crate::common::data::ProcessorId;
use crate::soc::coherence::CoherenceNotifier;

/// Trait for coherence protocol components a cache can be attached to.
pub trait CoherenceGateway {
    /// Stores the notifier used to report asynchronous events to the cache.
    ///
    /// Called once by the cache during construction.
    fn register_observer(&mut self, notifier: CoherenceNotifier);

    /// Asks for permission to complete an access.
    ///
    /// Returns `true` if the access may complete immediately. Returning `false`
    /// obliges the protocol to send exactly one
    /// [`DataReceived`](crate::soc::coherence::CoherenceEventKind::DataReceived)
    /// notification for `(processor, block)` at some later point.
    ///
    /// # Arguments
    ///
    /// * `is_load` - `true` for loads, `false` for stores.
    /// * `block` - Block-aligned address.
    /// * `processor` - Requesting processor.
    fn request_permission(&mut self, is_load: bool, block: u64, processor: ProcessorId) -> bool;

    /// Advances protocol state by one tick.
    fn tick(&mut self) {}
}
