//! Statistics unit tests.
//!
//! Verifies default initialization, derived rates, and that the counters a
//! cache accumulates agree with each other after a mixed workload.

use cachesim_core::config::CacheConfig;
use cachesim_core::stats::{BranchStats, CacheStats};
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn default_stats_all_zero() {
    let stats = CacheStats::default();
    assert_eq!(stats.accesses, 0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.completions, 0);
    assert_eq!(stats.hit_rate(), 0.0);
    assert_eq!(stats.miss_rate(), 0.0);
    assert_eq!(BranchStats::default().accuracy(), 0.0);
}

#[test]
fn rates_from_counters() {
    let stats = CacheStats {
        accesses: 8,
        hits: 6,
        misses: 2,
        ..CacheStats::default()
    };
    assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!((stats.miss_rate() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn cache_counters_are_consistent() {
    let mut ctx = TestContext::denying(&CacheConfig::lru(2, 1, 6));
    ctx.coherence.set_deny(false);
    let _ = ctx.load_sequence(&[0x000, 0x040, 0x080, 0x000, 0x100]);
    ctx.coherence.set_deny(true);
    let _ = ctx.store(0x0C0);
    let _ = ctx.store(0x140);
    assert!(ctx.coherence.grant_now(0, 0x0C0));
    ctx.tick();

    let stats = ctx.cache.stats().clone();
    assert_eq!(stats.accesses, 7);
    assert_eq!(stats.hits + stats.misses, stats.accesses);
    assert_eq!(stats.loads + stats.stores, stats.accesses);
    assert_eq!((stats.loads, stats.stores), (5, 2));
    assert_eq!(stats.immediate_grants, 5);
    assert_eq!(stats.deferred_grants, 1);
    assert_eq!(stats.completions, 6);
    assert_eq!(stats.ticks, 1);
    assert_eq!(ctx.cache.pending_len(), 1);
}

#[test]
fn scenario_hit_rate() {
    let mut ctx = TestContext::new(&CacheConfig::lru(2, 0, 6));
    let _ = ctx.load_sequence(&[0, 64, 0, 128]);
    let stats = ctx.cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 3, 1));
    assert!((stats.hit_rate() - 0.25).abs() < f64::EPSILON);
}
