//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors and the [`BranchUnit`]
//! component that replays branch records through them. Each record is predicted
//! and then immediately trained with its real outcome.

pub use self::branch_predictor::BranchPredictor;

/// Branch predictor trait.
pub mod branch_predictor;

/// Two-bit saturating counter.
pub mod counter;

/// PC-concatenated-with-history predictor.
pub mod gselect;

/// Counter-only predictor indexed by PC bits.
pub mod two_bit;

use std::io::Write;

use tracing::{debug, trace};

use self::{gselect::GSelectPredictor, two_bit::TwoBitPredictor};
use crate::common::data::{BranchOp, ProcessorId};
use crate::common::error::SimError;
use crate::config::{BranchConfig, PredictorModel};
use crate::sim::{self, Component};
use crate::stats::BranchStats;

/// Enum wrapper for static dispatch of branch predictors.
#[derive(Clone, Debug)]
pub enum BranchPredictorWrapper {
    /// Counter-only model.
    TwoBit(TwoBitPredictor),
    /// PC + global history model.
    GSelect(GSelectPredictor),
}

impl BranchPredictorWrapper {
    /// Creates the predictor selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: &BranchConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(match config.model {
            PredictorModel::Counter => Self::TwoBit(TwoBitPredictor::new(config.table_bits)?),
            PredictorModel::GSelect => Self::GSelect(GSelectPredictor::new(
                config.table_bits,
                config.history_bits,
            )?),
        })
    }

    /// Table slot `pc` maps to under the current state.
    pub const fn index(&self, pc: u64) -> usize {
        match self {
            Self::TwoBit(bp) => bp.index(pc),
            Self::GSelect(bp) => bp.index(pc),
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict_branch(&self, pc: u64) -> bool {
        match self {
            Self::TwoBit(bp) => bp.predict_branch(pc),
            Self::GSelect(bp) => bp.predict_branch(pc),
        }
    }

    #[inline(always)]
    fn update_branch(&mut self, pc: u64, taken: bool) {
        match self {
            Self::TwoBit(bp) => bp.update_branch(pc, taken),
            Self::GSelect(bp) => bp.update_branch(pc, taken),
        }
    }
}

/// Branch prediction component driven by branch trace records.
#[derive(Clone, Debug)]
pub struct BranchUnit {
    predictor: BranchPredictorWrapper,
    stats: BranchStats,
}

impl BranchUnit {
    /// Builds the unit from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for an invalid configuration, e.g. a GSelect
    /// history wider than the table index.
    pub fn new(config: &BranchConfig) -> Result<Self, SimError> {
        let predictor = BranchPredictorWrapper::new(config)?;
        debug!(
            table_bits = config.table_bits,
            history_bits = config.history_bits,
            model = ?config.model,
            "branch unit constructed"
        );
        Ok(Self {
            predictor,
            stats: BranchStats::default(),
        })
    }

    /// Predicts the address following `op`, then trains on its real outcome.
    ///
    /// A taken prediction returns the record's `next_pc`; a not-taken prediction
    /// returns `pc + 4`.
    pub fn request(&mut self, op: &BranchOp, processor: ProcessorId) -> u64 {
        let predicted_taken = self.predictor.predict_branch(op.pc);
        let predicted = if predicted_taken {
            op.next_pc
        } else {
            op.fallthrough()
        };

        let taken = op.taken();
        self.predictor.update_branch(op.pc, taken);

        self.stats.lookups += 1;
        if taken {
            self.stats.taken += 1;
        }
        if predicted_taken == taken {
            self.stats.correct += 1;
        } else {
            self.stats.mispredictions += 1;
        }

        trace!(
            processor,
            pc = op.pc,
            predicted,
            actual = op.next_pc,
            "branch predicted"
        );
        predicted
    }

    /// The underlying predictor.
    pub const fn predictor(&self) -> &BranchPredictorWrapper {
        &self.predictor
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &BranchStats {
        &self.stats
    }

    /// Tears the unit down and returns its final statistics.
    pub fn destroy(self) -> BranchStats {
        debug!(lookups = self.stats.lookups, "branch unit destroyed");
        self.stats
    }
}

impl Component for BranchUnit {
    fn name(&self) -> &'static str {
        "branch"
    }

    /// Prediction happens entirely inside [`BranchUnit::request`]; ticks only
    /// signal that the unit is willing to continue.
    fn tick(&mut self) -> Result<bool, SimError> {
        Ok(true)
    }

    fn finish(&self, out: &mut dyn Write) -> Result<(), SimError> {
        sim::write_report(out, self.name(), &self.stats)
    }
}
