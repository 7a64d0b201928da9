use std::cell::RefCell;
use std::rc::Rc;

use cachesim_core::Cache;
use cachesim_core::core::Access;
use cachesim_core::common::{MemOp, ProcessorId, RequestTag, SimError};
use cachesim_core::config::CacheConfig;
use tracing_subscriber::EnvFilter;

use crate::common::mocks::coherence::ScriptedCoherence;

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`, e.g. `RUST_LOG=cachesim_core=trace cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records completion callbacks in the order they fire.
#[derive(Clone, Debug, Default)]
pub struct Completions {
    log: Rc<RefCell<Vec<(ProcessorId, RequestTag)>>>,
}

impl Completions {
    /// A callback that appends `(processor, tag)` to this log.
    pub fn callback(&self) -> impl FnOnce(ProcessorId, RequestTag) + 'static {
        let log = Rc::clone(&self.log);
        move |processor, tag| log.borrow_mut().push((processor, tag))
    }

    /// Every completion so far, oldest first.
    pub fn all(&self) -> Vec<(ProcessorId, RequestTag)> {
        self.log.borrow().clone()
    }

    /// Completed tag values, oldest first.
    pub fn tags(&self) -> Vec<i64> {
        self.log.borrow().iter().map(|(_, tag)| tag.0).collect()
    }

    /// Number of completions so far.
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// True until the first completion fires.
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

/// A cache wired to a scripted coherence protocol.
pub struct TestContext {
    pub cache: Cache,
    pub coherence: ScriptedCoherence,
    pub completions: Completions,
    next_tag: i64,
}

impl TestContext {
    /// Builds a cache whose coherence grants everything immediately.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_coherence(config, ScriptedCoherence::granting())
    }

    /// Builds a cache whose coherence denies everything until scripted otherwise.
    pub fn denying(config: &CacheConfig) -> Self {
        Self::with_coherence(config, ScriptedCoherence::denying())
    }

    /// Builds a cache registered with `coherence`.
    pub fn with_coherence(config: &CacheConfig, coherence: ScriptedCoherence) -> Self {
        init_tracing();
        let cache = Cache::new(config, coherence.gateway()).unwrap();
        Self {
            cache,
            coherence,
            completions: Completions::default(),
            next_tag: 1,
        }
    }

    /// Issues `op` from `processor` with the next sequential tag.
    pub fn issue(&mut self, op: MemOp, processor: ProcessorId) -> Result<Access, SimError> {
        let tag = RequestTag(self.next_tag);
        self.next_tag += 1;
        self.cache
            .request(op, processor, tag, self.completions.callback())
    }

    /// Loads `address` from processor 0; panics if the request is rejected.
    pub fn load(&mut self, address: u64) -> Access {
        self.issue(MemOp::load(address), 0).unwrap()
    }

    /// Stores to `address` from processor 0; panics if the request is rejected.
    pub fn store(&mut self, address: u64) -> Access {
        self.issue(MemOp::store(address), 0).unwrap()
    }

    /// Loads each address in turn and returns whether each hit.
    pub fn load_sequence(&mut self, addresses: &[u64]) -> Vec<bool> {
        addresses.iter().map(|&a| self.load(a).hit).collect()
    }

    /// Ticks the cache once; panics on a protocol error or a torn-down cache.
    pub fn tick(&mut self) {
        assert!(self.cache.tick().unwrap());
    }
}
