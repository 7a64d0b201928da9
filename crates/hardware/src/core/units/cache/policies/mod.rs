//! Cache Replacement Policies.
//!
//! Implements the algorithms that choose victim lines and maintain per-line
//! replacement metadata in set-associative caches.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, tracked with per-line recency counters.
//! - `Rrip`: Re-Reference Interval Prediction with configurable RRPV width.
//!
//! Both policies keep their state in the [`CacheLine`] metadata fields, so a
//! policy object is stateless apart from its parameters and one instance serves
//! every set.

/// Least Recently Used replacement policy.
pub mod lru;

/// Re-Reference Interval Prediction replacement policy.
pub mod rrip;

pub use lru::LruPolicy;
pub use rrip::RripPolicy;

use super::line::CacheLine;

/// Trait for cache replacement policies.
///
/// Every method receives the full set. Sets always hold at least one line;
/// the cache rejects zero-way configurations before any policy is consulted.
pub trait ReplacementPolicy: Send + Sync + std::fmt::Debug {
    /// Updates metadata after a hit on `way`.
    fn on_hit(&self, lines: &mut [CacheLine], way: usize);

    /// Updates metadata after a miss filled `way`.
    ///
    /// # Arguments
    ///
    /// * `lines` - The set; `lines[way]` already holds the new block.
    /// * `way` - The way chosen by [`get_victim`](Self::get_victim).
    /// * `was_valid` - Whether the way held a block before the fill.
    fn on_fill(&self, lines: &mut [CacheLine], way: usize, was_valid: bool);

    /// Selects the way to fill on a miss.
    ///
    /// Invalid ways are always preferred. May age metadata while searching.
    fn get_victim(&self, lines: &mut [CacheLine]) -> usize;
}

/// Index of the first invalid way.
#[inline]
pub(crate) fn first_invalid(lines: &[CacheLine]) -> Option<usize> {
    lines.iter().position(|line| !line.is_valid())
}
