//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait that direction predictors
//! implement. Targets are not learned: a taken prediction always uses the target
//! carried by the trace record.

/// Trait for branch direction prediction algorithms.
pub trait BranchPredictor {
    /// Predicts whether the branch at `pc` will be taken.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    fn predict_branch(&self, pc: u64) -> bool;

    /// Trains the predictor with the resolved outcome.
    ///
    /// Must be called after [`predict_branch`](Self::predict_branch) for the same
    /// branch and before the next prediction, so that both use the same table slot.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    /// * `taken` - Whether the branch was actually taken
    fn update_branch(&mut self, pc: u64, taken: bool);
}
