//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each valid line carries a recency counter: 0 for the most recently used line,
//! growing by one every time a more recent line overtakes it. When a line is
//! touched, only the lines that were more recent than it age, so the valid lines
//! of a set always hold the distinct values `0..n`.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()` / `on_fill()`: O(W) where W is the number of ways
//!   - `get_victim()`: O(W)
//! - **Space Complexity:** one counter per line
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Cyclic scans one block larger than the set (every access misses)

use super::{CacheLine, ReplacementPolicy, first_invalid};

/// LRU policy. Stateless; metadata lives in the lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }

    /// Moves `way` to the MRU position.
    ///
    /// Every other valid line whose recency is strictly below `previous` ages by
    /// one, then `way` becomes 0.
    fn promote(lines: &mut [CacheLine], way: usize, previous: u32) {
        for (i, line) in lines.iter_mut().enumerate() {
            if i != way && line.valid && line.recency < previous {
                line.recency += 1;
            }
        }
        lines[way].recency = 0;
    }
}

impl ReplacementPolicy for LruPolicy {
    fn on_hit(&self, lines: &mut [CacheLine], way: usize) {
        let previous = lines[way].recency;
        Self::promote(lines, way, previous);
    }

    /// A way that was invalid has no position in the recency order, so every
    /// other valid line ages.
    fn on_fill(&self, lines: &mut [CacheLine], way: usize, was_valid: bool) {
        let previous = if was_valid {
            lines[way].recency
        } else {
            u32::MAX
        };
        Self::promote(lines, way, previous);
    }

    /// Returns the first invalid way, otherwise the valid way with the largest
    /// recency (lowest index on ties).
    fn get_victim(&self, lines: &mut [CacheLine]) -> usize {
        if let Some(way) = first_invalid(lines) {
            return way;
        }
        let mut victim = 0;
        for (i, line) in lines.iter().enumerate().skip(1) {
            if line.recency > lines[victim].recency {
                victim = i;
            }
        }
        victim
    }
}
