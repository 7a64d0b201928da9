//! Trace-driven multiprocessor cache and branch predictor models.
//!
//! This crate models the structural behaviour of a memory hierarchy for
//! architectural exploration:
//! 1. **Cache:** Set-associative lookup and fill with LRU or RRIP replacement.
//! 2. **Coherence:** A gateway trait to an external protocol; accesses complete only
//!    once the protocol grants permission, via callbacks drained on each tick.
//! 3. **Branch prediction:** 2-bit counter and GSelect predictors.
//! 4. **Simulation:** Component lifecycle, configuration and statistics.
//!
//! Timing is not modelled: the components track hits, misses, replacement order
//! and completion order, not cycle counts.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use cachesim_core::common::{MemOp, RequestTag};
//! use cachesim_core::config::CacheConfig;
//! use cachesim_core::soc::ImmediateGrant;
//! use cachesim_core::Cache;
//!
//! let mut cache = Cache::new(&CacheConfig::lru(2, 0, 6), Box::new(ImmediateGrant::new()))?;
//! let done = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&done);
//! let access = cache.request(MemOp::load(0x40), 0, RequestTag(1), move |_, tag| seen.set(tag.0))?;
//! assert!(!access.hit);
//! assert!(cache.tick()?);
//! assert_eq!(done.get(), 1);
//! # Ok::<(), cachesim_core::common::SimError>(())
//! ```

/// Common types (address decoding, trace records, errors).
pub mod common;
/// Configuration (defaults, enums, validation).
pub mod config;
/// Hardware units (cache, branch predictor).
pub mod core;
/// Component lifecycle and report writing.
pub mod sim;
/// Coherence gateway boundary.
pub mod soc;
/// Statistics collection.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Branch prediction component.
pub use crate::core::BranchUnit;
/// Set-associative cache component.
pub use crate::core::Cache;
