//! Functional units.
//!
//! This module contains the simulated hardware units: the set-associative data
//! cache with its replacement policies and completion queue, and the branch
//! prediction unit.

/// Branch prediction unit (2-bit and GSelect predictors).
pub mod bru;

/// Set-associative cache with LRU/RRIP replacement and coherence-gated completion.
pub mod cache;
