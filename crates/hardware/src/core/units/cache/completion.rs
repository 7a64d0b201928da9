//! Completion queue for requests awaiting coherence permission.
//!
//! Every cache request ends in exactly one completion callback. The queue holds
//! requests between issue and that callback in two disjoint collections:
//! 1. **Pending:** Denied by coherence, keyed by `(processor, block)`. At most one
//!    request per key may wait at a time.
//! 2. **Ready:** Granted (immediately or by notification), in the order they became
//!    ready. Drained in full once per tick.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::common::data::{ProcessorId, RequestTag};
use crate::common::error::ProtocolError;

/// Callback invoked once a request may complete.
pub type CompletionFn = Box<dyn FnOnce(ProcessorId, RequestTag)>;

/// An in-flight memory access.
pub struct PendingRequest {
    /// Caller-supplied correlation token.
    pub tag: RequestTag,
    /// Block-aligned address.
    pub block: u64,
    /// Requesting processor.
    pub processor: ProcessorId,
    completion: CompletionFn,
}

impl PendingRequest {
    /// Creates a request record.
    pub fn new(tag: RequestTag, block: u64, processor: ProcessorId, completion: CompletionFn) -> Self {
        Self {
            tag,
            block,
            processor,
            completion,
        }
    }

    /// Fires the completion callback, consuming the record.
    pub fn complete(self) {
        (self.completion)(self.processor, self.tag);
    }

    const fn key(&self) -> (ProcessorId, u64) {
        (self.processor, self.block)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("tag", &self.tag)
            .field("block", &format_args!("{:#x}", self.block))
            .field("processor", &self.processor)
            .finish_non_exhaustive()
    }
}

/// Pending and ready request collections.
#[derive(Debug, Default)]
pub struct CompletionQueue {
    pending: HashMap<(ProcessorId, u64), PendingRequest>,
    ready: Vec<PendingRequest>,
}

impl CompletionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request for `(processor, block)` is waiting on coherence.
    pub fn is_pending(&self, processor: ProcessorId, block: u64) -> bool {
        self.pending.contains_key(&(processor, block))
    }

    /// Queues a granted request for the next drain.
    pub fn push_ready(&mut self, request: PendingRequest) {
        self.ready.push(request);
    }

    /// Parks a denied request until coherence grants it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DuplicatePending`] if a request for the same
    /// `(processor, block)` is already waiting. The new request is dropped without
    /// its callback firing.
    pub fn push_pending(&mut self, request: PendingRequest) -> Result<(), ProtocolError> {
        match self.pending.entry(request.key()) {
            Entry::Occupied(_) => Err(ProtocolError::DuplicatePending {
                processor: request.processor,
                block: request.block,
            }),
            Entry::Vacant(slot) => {
                let _ = slot.insert(request);
                Ok(())
            }
        }
    }

    /// Moves the pending request for `(processor, block)` to the ready list.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnmatchedNotification`] if no such request is pending.
    pub fn grant(&mut self, processor: ProcessorId, block: u64) -> Result<RequestTag, ProtocolError> {
        let request = self
            .pending
            .remove(&(processor, block))
            .ok_or(ProtocolError::UnmatchedNotification { processor, block })?;
        let tag = request.tag;
        self.ready.push(request);
        Ok(tag)
    }

    /// Fires and discards every ready request, in the order they became ready.
    ///
    /// Returns the number of callbacks invoked.
    pub fn drain_ready(&mut self) -> usize {
        let ready = std::mem::take(&mut self.ready);
        let count = ready.len();
        for request in ready {
            request.complete();
        }
        count
    }

    /// Number of requests waiting on coherence.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of requests that will complete on the next drain.
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    /// Whether both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.ready.is_empty()
    }

    /// Discards every outstanding request without firing callbacks.
    ///
    /// Returns the number of records dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len() + self.ready.len();
        self.pending.clear();
        self.ready.clear();
        dropped
    }
}
