//! Two-Bit Counter Branch Predictor.
//!
//! A table of 2-bit saturating counters indexed directly by PC bits. Each static
//! branch trains its own counter (modulo aliasing), so the predictor captures
//! per-branch bias but no correlation between branches.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `update()`: O(1)
//! - **Space Complexity:** O(2^N) counters where N is the table index width
//! - **Best Case:** Strongly biased branches (loop back-edges)
//! - **Worst Case:** Alternating branches (T, N, T, N) mispredict every time

use super::{BranchPredictor, counter::SaturatingCounter};
use crate::common::error::ConfigError;
use crate::config::MAX_PREDICTOR_BITS;

/// Number of low PC bits ignored when indexing.
pub const PC_SHIFT: u32 = 3;

/// Extracts the table-index bits of `pc`: `(pc >> 3) & (2^table_bits - 1)`.
#[inline(always)]
pub(crate) const fn pc_index_bits(pc: u64, table_bits: u32) -> usize {
    ((pc >> PC_SHIFT) & ((1u64 << table_bits) - 1)) as usize
}

/// Counter-only predictor.
#[derive(Clone, Debug)]
pub struct TwoBitPredictor {
    /// Pattern table of 2-bit counters.
    table: Vec<SaturatingCounter>,
    /// `log2` of the table size.
    table_bits: u32,
}

impl TwoBitPredictor {
    /// Creates a predictor with `2^table_bits` counters, all weakly not-taken.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PredictorTableTooLarge`] above
    /// [`MAX_PREDICTOR_BITS`].
    pub fn new(table_bits: u32) -> Result<Self, ConfigError> {
        if table_bits > MAX_PREDICTOR_BITS {
            return Err(ConfigError::PredictorTableTooLarge(table_bits));
        }
        Ok(Self {
            table: vec![SaturatingCounter::WEAKLY_NOT_TAKEN; 1 << table_bits],
            table_bits,
        })
    }

    /// Table slot used for `pc`.
    #[inline]
    pub const fn index(&self, pc: u64) -> usize {
        pc_index_bits(pc, self.table_bits)
    }

    /// Counter currently guarding `pc`.
    pub fn counter(&self, pc: u64) -> SaturatingCounter {
        self.table[self.index(pc)]
    }
}

impl BranchPredictor for TwoBitPredictor {
    fn predict_branch(&self, pc: u64) -> bool {
        self.counter(pc).predicts_taken()
    }

    fn update_branch(&mut self, pc: u64, taken: bool) {
        let idx = self.index(pc);
        self.table[idx].train(taken);
    }
}
