//! Re-Reference Interval Prediction (RRIP) Replacement Policy.
//!
//! Each line carries a re-reference prediction value (RRPV) in `[0, 2^B - 1]`.
//! Hits predict a near re-reference (RRPV 0). Fills are inserted at the
//! "long" interval `2^(B-1) - 1`, and every other resident line moves one step
//! further away. The victim is a line predicted to be re-referenced in the
//! distant future, i.e. at the maximum RRPV.
//!
//! # Victim search
//!
//! If no line sits at the maximum, every valid line ages by one and the set is
//! rescanned. No line is at the maximum before an aging pass, so every valid line
//! gains exactly one per pass and the highest of them reaches the maximum after at
//! most `2^B - 1` passes. The loop is bounded accordingly.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(1)
//!   - `on_fill()`: O(W)
//!   - `get_victim()`: O(W × 2^B) worst case
//! - **Space Complexity:** B bits per line
//! - **Best Case:** Mixed workloads where scans would flush an LRU cache
//! - **Worst Case:** Recency-friendly loops that fit the cache exactly

use super::{CacheLine, ReplacementPolicy, first_invalid};
use crate::common::error::ConfigError;
use crate::config::MAX_RRPV_BITS;

/// RRIP policy parameterised by the RRPV width.
#[derive(Clone, Copy, Debug)]
pub struct RripPolicy {
    max: u8,
    insertion: u8,
}

impl RripPolicy {
    /// Creates an RRIP policy with `bits`-wide RRPVs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RrpvBitsOutOfRange`] unless `bits` is in
    /// `1..=`[`MAX_RRPV_BITS`].
    pub const fn new(bits: u32) -> Result<Self, ConfigError> {
        if bits == 0 || bits > MAX_RRPV_BITS {
            return Err(ConfigError::RrpvBitsOutOfRange(bits));
        }
        let max = ((1u16 << bits) - 1) as u8;
        let insertion = ((1u16 << (bits - 1)) - 1) as u8;
        Ok(Self { max, insertion })
    }

    /// Largest RRPV, `2^B - 1`.
    #[inline]
    pub const fn max_rrpv(&self) -> u8 {
        self.max
    }

    /// RRPV given to newly filled lines, `2^(B-1) - 1`.
    #[inline]
    pub const fn insertion_rrpv(&self) -> u8 {
        self.insertion
    }

    fn age(&self, lines: &mut [CacheLine], skip: Option<usize>) {
        for (i, line) in lines.iter_mut().enumerate() {
            if Some(i) != skip && line.valid && line.rrpv < self.max {
                line.rrpv += 1;
            }
        }
    }
}

impl ReplacementPolicy for RripPolicy {
    fn on_hit(&self, lines: &mut [CacheLine], way: usize) {
        lines[way].rrpv = 0;
    }

    fn on_fill(&self, lines: &mut [CacheLine], way: usize, _was_valid: bool) {
        lines[way].rrpv = self.insertion;
        self.age(lines, Some(way));
    }

    fn get_victim(&self, lines: &mut [CacheLine]) -> usize {
        if let Some(way) = first_invalid(lines) {
            return way;
        }
        for _ in 0..=self.max {
            if let Some(way) = lines.iter().position(|line| line.rrpv == self.max) {
                return way;
            }
            self.age(lines, None);
        }
        // Unreachable while every line is valid; see the module docs.
        let mut victim = 0;
        for (i, line) in lines.iter().enumerate().skip(1) {
            if line.rrpv > lines[victim].rrpv {
                victim = i;
            }
        }
        victim
    }
}
