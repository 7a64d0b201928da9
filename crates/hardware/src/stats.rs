//! Statistics collection and reporting.
//!
//! This module tracks the counters analysis tools tabulate after a trace replay:
//! 1. **Cache behaviour:** Accesses by kind, hits, misses and evictions.
//! 2. **Coherence traffic:** Immediate versus deferred grants and completions.
//! 3. **Branch prediction:** Lookups, correct predictions and mispredictions.
//!
//! Both structures serialize with `serde`, which is how components' `finish`
//! emit their report.

use serde::Serialize;

/// Cache counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests accepted.
    pub accesses: u64,
    /// Load requests.
    pub loads: u64,
    /// Store requests.
    pub stores: u64,
    /// Requests that found their block resident.
    pub hits: u64,
    /// Requests that filled a line.
    pub misses: u64,
    /// Misses that replaced a valid line.
    pub evictions: u64,
    /// Evictions of lines written since their fill.
    pub dirty_evictions: u64,
    /// Permission requests granted on the spot.
    pub immediate_grants: u64,
    /// Permission requests denied and later granted by notification.
    pub deferred_grants: u64,
    /// Completion callbacks fired.
    pub completions: u64,
    /// Ticks processed.
    pub ticks: u64,
}

impl CacheStats {
    /// Fraction of accesses that hit, or 0 with no accesses.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// Fraction of accesses that missed, or 0 with no accesses.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }
}

/// Branch predictor counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    /// Branches predicted.
    pub lookups: u64,
    /// Predictions whose direction matched the outcome.
    pub correct: u64,
    /// Predictions whose direction did not match.
    pub mispredictions: u64,
    /// Branches that were actually taken.
    pub taken: u64,
}

impl BranchStats {
    /// Fraction of predictions that were correct, or 0 with no lookups.
    pub fn accuracy(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.correct as f64 / self.lookups as f64
        }
    }
}
