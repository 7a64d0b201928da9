//! Set-Associative Cache Model.
//!
//! This module implements a set-associative cache that sits in front of a
//! coherence protocol. It models:
//! 1. **Lookup and Fill:** Hit detection and victim replacement under LRU or RRIP.
//! 2. **Permission:** One coherence permission request per access.
//! 3. **Completion:** Deferred completion callbacks, fired on the tick after the
//!    request is granted.
//!
//! # Request lifecycle
//!
//! ```text
//! request ─┬─ granted ──────────────────────────────► ready ──tick──► callback
//!          └─ denied ──► pending ──DataReceived──────►
//! ```
//!
//! Line state is updated synchronously inside [`Cache::request`]; only the
//! completion is deferred.

/// Pending/ready request bookkeeping.
pub mod completion;

/// Cache line and set storage.
pub mod line;

/// Cache replacement policy implementations (LRU, RRIP).
pub mod policies;

use std::fmt;
use std::io::Write;
use std::sync::mpsc::Receiver;

use tracing::{debug, trace, warn};

use self::completion::{CompletionQueue, PendingRequest};
use self::line::CacheSet;
use self::policies::{LruPolicy, ReplacementPolicy, RripPolicy};
use crate::common::addr::Geometry;
use crate::common::data::{AccessKind, MemOp, ProcessorId, RequestTag};
use crate::common::error::{ConfigError, ProtocolError, SimError};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};
use crate::sim::{self, Component};
use crate::soc::coherence::{CoherenceEvent, CoherenceEventKind, mailbox};
use crate::soc::traits::CoherenceGateway;
use crate::stats::CacheStats;

/// Outcome of a single [`Cache::request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Whether the block was resident.
    pub hit: bool,
    /// Block-aligned address accessed.
    pub block: u64,
    /// Set the block maps to.
    pub set: usize,
    /// Way that now holds the block.
    pub way: usize,
    /// Block address of the valid line replaced on a miss.
    pub evicted: Option<u64>,
    /// Whether coherence granted permission immediately.
    pub granted: bool,
}

/// Set-associative cache attached to a coherence gateway.
pub struct Cache {
    geometry: Geometry,
    ways: usize,
    processors: usize,
    policy_kind: PolicyType,
    sets: Vec<CacheSet>,
    policy: Box<dyn ReplacementPolicy>,
    queue: CompletionQueue,
    coherence: Box<dyn CoherenceGateway>,
    mailbox: Receiver<CoherenceEvent>,
    stats: CacheStats,
}

impl Cache {
    /// Builds a cache and registers it with `coherence`.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry, replacement policy and processor count.
    /// * `coherence` - Protocol that answers permission requests for this cache.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is invalid and
    /// [`SimError::Allocation`] if line storage cannot be allocated.
    pub fn new(config: &CacheConfig, mut coherence: Box<dyn CoherenceGateway>) -> Result<Self, SimError> {
        config.validate()?;

        let geometry = Geometry::new(config.set_bits, config.block_bits);
        let policy: Box<dyn ReplacementPolicy> = match config.policy {
            PolicyType::Lru => Box::new(LruPolicy::new()),
            PolicyType::Rrip => {
                let bits = config.rrpv_bits.ok_or(ConfigError::MissingRrpvBits)?;
                Box::new(RripPolicy::new(bits)?)
            }
        };

        let num_sets = geometry.num_sets();
        let mut sets = Vec::new();
        sets.try_reserve_exact(num_sets)
            .map_err(|source| SimError::Allocation {
                what: "cache set array",
                source,
            })?;
        for _ in 0..num_sets {
            sets.push(CacheSet::new(config.ways, geometry.block_size())?);
        }

        let (notifier, receiver) = mailbox();
        coherence.register_observer(notifier);

        debug!(
            sets = num_sets,
            ways = config.ways,
            block_size = geometry.block_size(),
            policy = ?config.policy,
            "cache constructed"
        );

        Ok(Self {
            geometry,
            ways: config.ways,
            processors: config.processors,
            policy_kind: config.policy,
            sets,
            policy,
            queue: CompletionQueue::new(),
            coherence,
            mailbox: receiver,
            stats: CacheStats::default(),
        })
    }

    /// Performs one memory access.
    ///
    /// Applies queued coherence notifications, then updates line and replacement
    /// state, asks coherence for permission, and queues the request. `completion`
    /// fires exactly once, on the first tick at which the request is ready.
    ///
    /// # Arguments
    ///
    /// * `op` - Load or store and its byte address.
    /// * `processor` - Issuing processor.
    /// * `tag` - Correlation token passed back to `completion`.
    /// * `completion` - Invoked with `(processor, tag)`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownProcessor`] for a processor outside the
    /// configured range and [`ProtocolError::DuplicatePending`] if `processor`
    /// already waits on the same block. Rejected requests leave line state unchanged
    /// and never invoke `completion`. A protocol error raised by a queued
    /// notification is returned before the request is looked at.
    pub fn request<F>(
        &mut self,
        op: MemOp,
        processor: ProcessorId,
        tag: RequestTag,
        completion: F,
    ) -> Result<Access, SimError>
    where
        F: FnOnce(ProcessorId, RequestTag) + 'static,
    {
        self.apply_notifications()?;
        self.check_processor(processor)?;
        let block = self.geometry.block_align(op.address);
        if self.queue.is_pending(processor, block) {
            return Err(ProtocolError::DuplicatePending { processor, block }.into());
        }

        let set = self.geometry.set_index(block);
        let (hit, way, evicted) = self.lookup_or_fill(set, self.geometry.tag(block), op.kind);

        self.stats.accesses += 1;
        match op.kind {
            AccessKind::Load => self.stats.loads += 1,
            AccessKind::Store => self.stats.stores += 1,
        }

        let granted = self
            .coherence
            .request_permission(op.kind.is_load(), block, processor);
        let request = PendingRequest::new(tag, block, processor, Box::new(completion));
        if granted {
            self.stats.immediate_grants += 1;
            self.queue.push_ready(request);
        } else {
            self.queue.push_pending(request)?;
        }

        trace!(
            processor,
            block,
            set,
            way,
            hit,
            granted,
            "cache access"
        );

        Ok(Access {
            hit,
            block,
            set,
            way,
            evicted,
            granted,
        })
    }

    /// Finds `tag` in `set` or fills it into a victim way.
    ///
    /// Returns `(hit, way, evicted_block)`.
    fn lookup_or_fill(&mut self, set: usize, tag: u64, kind: AccessKind) -> (bool, usize, Option<u64>) {
        let is_store = kind == AccessKind::Store;
        let lines = self.sets[set].lines_mut();

        if let Some(way) = lines.iter().position(|line| line.holds(tag)) {
            self.policy.on_hit(lines, way);
            if is_store {
                lines[way].dirty = true;
            }
            self.stats.hits += 1;
            return (true, way, None);
        }

        self.stats.misses += 1;
        let way = self.policy.get_victim(lines);
        let victim = &lines[way];
        let was_valid = victim.valid;
        let evicted = if was_valid {
            self.stats.evictions += 1;
            if victim.dirty {
                self.stats.dirty_evictions += 1;
            }
            Some(self.geometry.block_address(set, victim.tag))
        } else {
            None
        };

        lines[way].fill(tag, is_store);
        self.policy.on_fill(lines, way, was_valid);
        (false, way, evicted)
    }

    /// Applies one coherence event.
    ///
    /// `DataReceived` moves the matching pending request to the ready list. Other
    /// kinds are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnmatchedNotification`] if no request for the
    /// event's `(processor, block)` is pending, and
    /// [`ProtocolError::UnknownProcessor`] for an out-of-range processor.
    pub fn on_coherence_event(&mut self, event: CoherenceEvent) -> Result<(), SimError> {
        match event.kind {
            CoherenceEventKind::DataReceived => {
                self.check_processor(event.processor)?;
                let tag = self.queue.grant(event.processor, event.block)?;
                self.stats.deferred_grants += 1;
                debug!(
                    processor = event.processor,
                    block = event.block,
                    tag = tag.0,
                    "pending request granted"
                );
            }
            CoherenceEventKind::Invalidate => {
                trace!(
                    processor = event.processor,
                    block = event.block,
                    "ignoring invalidation"
                );
            }
        }
        Ok(())
    }

    /// Applies every event posted to the mailbox, in arrival order.
    ///
    /// [`request`](Self::request) and [`tick`](Self::tick) call this first, so a
    /// driver only needs it to observe grants between the two.
    ///
    /// # Errors
    ///
    /// Stops at the first event that violates the protocol and returns its error;
    /// later events stay queued.
    pub fn apply_notifications(&mut self) -> Result<(), SimError> {
        while let Ok(event) = self.mailbox.try_recv() {
            self.on_coherence_event(event)?;
        }
        Ok(())
    }

    /// Advances the cache by one tick.
    ///
    /// Forwards the tick to coherence, applies queued notifications, then fires
    /// and discards every ready request. Always returns `Ok(true)` unless a
    /// notification violated the protocol.
    ///
    /// # Errors
    ///
    /// Propagates the first protocol error raised by a queued notification.
    pub fn tick(&mut self) -> Result<bool, SimError> {
        self.coherence.tick();
        self.apply_notifications()?;
        let fired = self.queue.drain_ready();
        self.stats.completions += fired as u64;
        self.stats.ticks += 1;
        Ok(true)
    }

    /// Writes the statistics report to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn finish(&self, out: &mut dyn Write) -> Result<(), SimError> {
        sim::write_report(out, self.name(), &self.stats)
    }

    /// Tears the cache down, releasing line storage and outstanding request records.
    ///
    /// Requests still pending or ready are dropped without their callbacks firing.
    /// Returns the final statistics.
    pub fn destroy(mut self) -> CacheStats {
        let dropped = self.queue.clear();
        if dropped > 0 {
            warn!(dropped, "cache destroyed with outstanding requests");
        }
        debug!(accesses = self.stats.accesses, "cache destroyed");
        self.stats
    }

    /// Whether the block containing `address` is resident. Does not touch
    /// replacement state.
    pub fn contains(&self, address: u64) -> bool {
        let set = self.geometry.set_index(address);
        self.sets[set].find(self.geometry.tag(address)).is_some()
    }

    /// Block addresses resident in `set`, in way order.
    ///
    /// Returns an empty list for an out-of-range set.
    pub fn resident_blocks(&self, set: usize) -> Vec<u64> {
        self.sets.get(set).map_or_else(Vec::new, |s| {
            s.lines()
                .iter()
                .filter(|line| line.is_valid())
                .map(|line| self.geometry.block_address(set, line.tag()))
                .collect()
        })
    }

    /// The set at `index`.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    /// All sets in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Address decoder for this cache.
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Lines per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Configured replacement policy.
    pub const fn policy(&self) -> PolicyType {
        self.policy_kind
    }

    /// Whether `processor` waits on coherence for the block containing `address`.
    ///
    /// Reflects the notifications applied so far; see
    /// [`apply_notifications`](Self::apply_notifications).
    pub fn is_pending(&self, processor: ProcessorId, address: u64) -> bool {
        self.queue
            .is_pending(processor, self.geometry.block_align(address))
    }

    /// Requests waiting on coherence, as of the last applied notification.
    pub fn pending_len(&self) -> usize {
        self.queue.pending_len()
    }

    /// Requests that will complete on the next tick.
    pub fn ready_len(&self) -> usize {
        self.queue.ready_len()
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    const fn check_processor(&self, processor: ProcessorId) -> Result<(), ProtocolError> {
        if processor < self.processors {
            Ok(())
        } else {
            Err(ProtocolError::UnknownProcessor {
                processor,
                processors: self.processors,
            })
        }
    }
}

impl Component for Cache {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn tick(&mut self) -> Result<bool, SimError> {
        Self::tick(self)
    }

    fn finish(&self, out: &mut dyn Write) -> Result<(), SimError> {
        Self::finish(self, out)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("geometry", &self.geometry)
            .field("ways", &self.ways)
            .field("processors", &self.processors)
            .field("policy", &self.policy)
            .field("queue", &self.queue)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
