//! GSelect Branch Predictor.
//!
//! GSelect concatenates low PC bits with the global history register to index a
//! table of 2-bit counters. Unlike GShare, which XORs the two, the history
//! occupies its own low-order index bits and the PC contributes only the
//! remaining `table_bits - history_bits` bits.
//!
//! ```text
//! index = [ pc_bits (table_bits - history_bits) | history (history_bits) ]
//! ```
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `update()`: O(1)
//! - **Space Complexity:** O(2^N) counters where N is the table index width
//! - **Best Case:** Branches whose outcome follows from the last few outcomes
//! - **Worst Case:** Many static branches competing for few PC index bits

use super::{BranchPredictor, counter::SaturatingCounter, two_bit::pc_index_bits};
use crate::common::error::ConfigError;
use crate::config::MAX_PREDICTOR_BITS;

/// GSelect predictor.
#[derive(Clone, Debug)]
pub struct GSelectPredictor {
    /// Pattern table of 2-bit counters.
    table: Vec<SaturatingCounter>,
    /// `log2` of the table size.
    table_bits: u32,
    /// Global history register width.
    history_bits: u32,
    /// Global History Register, newest outcome in bit 0.
    ghr: u64,
}

impl GSelectPredictor {
    /// Creates a GSelect predictor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PredictorTableTooLarge`] above
    /// [`MAX_PREDICTOR_BITS`] and [`ConfigError::HistoryExceedsIndex`] if the
    /// history register is wider than the table index.
    pub fn new(table_bits: u32, history_bits: u32) -> Result<Self, ConfigError> {
        if table_bits > MAX_PREDICTOR_BITS {
            return Err(ConfigError::PredictorTableTooLarge(table_bits));
        }
        if history_bits > table_bits {
            return Err(ConfigError::HistoryExceedsIndex {
                history_bits,
                table_bits,
            });
        }
        Ok(Self {
            table: vec![SaturatingCounter::WEAKLY_NOT_TAKEN; 1 << table_bits],
            table_bits,
            history_bits,
            ghr: 0,
        })
    }

    #[inline]
    const fn history_mask(&self) -> u64 {
        (1u64 << self.history_bits) - 1
    }

    /// Table slot used for `pc` under the current history.
    pub const fn index(&self, pc: u64) -> usize {
        let pc_bits = pc_index_bits(pc, self.table_bits - self.history_bits);
        (pc_bits << self.history_bits) | (self.ghr & self.history_mask()) as usize
    }

    /// Current history register contents.
    pub const fn history(&self) -> u64 {
        self.ghr
    }

    /// Counter currently guarding `pc`.
    pub fn counter(&self, pc: u64) -> SaturatingCounter {
        self.table[self.index(pc)]
    }
}

impl BranchPredictor for GSelectPredictor {
    fn predict_branch(&self, pc: u64) -> bool {
        self.counter(pc).predicts_taken()
    }

    /// Trains the counter selected by the pre-update history, then shifts the
    /// outcome into the history register.
    fn update_branch(&mut self, pc: u64, taken: bool) {
        let idx = self.index(pc);
        self.table[idx].train(taken);
        if self.history_bits > 0 {
            self.ghr = ((self.ghr << 1) | u64::from(taken)) & self.history_mask();
        }
    }
}
