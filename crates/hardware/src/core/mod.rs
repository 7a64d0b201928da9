//! Processor-side hardware models.
//!
//! This module groups the units a processor's memory and fetch paths exercise
//! during trace replay.

/// Hardware units (data cache, branch predictor).
pub mod units;

pub use self::units::bru::BranchUnit;
pub use self::units::cache::{Access, Cache};
