//! Coherence notifications.
//!
//! A coherence protocol answers permission queries synchronously but grants
//! denied requests later, at times the protocol decides. Those grants travel
//! through a mailbox: the cache hands a [`CoherenceNotifier`] to the protocol at
//! construction and applies queued events, in arrival order, on its next tick.
//!
//! This module also provides [`ImmediateGrant`], a protocol that grants every
//! request on the spot. It stands in for coherence in single-processor runs.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::common::data::ProcessorId;
use crate::soc::traits::CoherenceGateway;

/// Kinds of events a coherence protocol can report to a cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoherenceEventKind {
    /// Data for a denied request has arrived; the request may complete.
    DataReceived,
    /// Another agent invalidated the block. Caches without an invalidation path
    /// ignore it.
    Invalidate,
}

/// An event reported by the coherence protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoherenceEvent {
    /// What happened.
    pub kind: CoherenceEventKind,
    /// Processor the event concerns.
    pub processor: ProcessorId,
    /// Block-aligned address the event concerns.
    pub block: u64,
}

impl CoherenceEvent {
    /// A data-received event.
    pub const fn data_received(processor: ProcessorId, block: u64) -> Self {
        Self {
            kind: CoherenceEventKind::DataReceived,
            processor,
            block,
        }
    }

    /// An invalidation event.
    pub const fn invalidate(processor: ProcessorId, block: u64) -> Self {
        Self {
            kind: CoherenceEventKind::Invalidate,
            processor,
            block,
        }
    }
}

/// Handle through which a coherence protocol posts events to one cache.
///
/// Cloning yields another handle to the same cache.
#[derive(Clone, Debug)]
pub struct CoherenceNotifier {
    tx: Sender<CoherenceEvent>,
}

impl CoherenceNotifier {
    /// Posts an event. Returns `false` if the cache has been torn down.
    pub fn notify(&self, event: CoherenceEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Posts a data-received event for `(processor, block)`.
    pub fn data_received(&self, processor: ProcessorId, block: u64) -> bool {
        self.notify(CoherenceEvent::data_received(processor, block))
    }
}

/// Creates a connected notifier and the receiving end owned by a cache.
pub(crate) fn mailbox() -> (CoherenceNotifier, Receiver<CoherenceEvent>) {
    let (tx, rx) = mpsc::channel();
    (CoherenceNotifier { tx }, rx)
}

/// Coherence stand-in that grants every request immediately.
#[derive(Debug, Default)]
pub struct ImmediateGrant {
    notifier: Option<CoherenceNotifier>,
    requests: u64,
    ticks: u64,
}

impl ImmediateGrant {
    /// Creates the gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of permission requests answered.
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    /// Number of ticks received.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether a cache has registered with this gateway.
    pub const fn is_registered(&self) -> bool {
        self.notifier.is_some()
    }
}

impl CoherenceGateway for ImmediateGrant {
    fn register_observer(&mut self, notifier: CoherenceNotifier) {
        self.notifier = Some(notifier);
    }

    fn request_permission(&mut self, _is_load: bool, _block: u64, _processor: ProcessorId) -> bool {
        self.requests += 1;
        true
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }
}
