//! Common types shared by every component of the simulator.
//!
//! This module provides the building blocks the cache, the branch unit and their
//! drivers agree on. It includes:
//! 1. **Address Decoding:** Power-of-two geometry and set/tag/block extraction.
//! 2. **Trace Records:** Memory and branch operations, processor ids and request tags.
//! 3. **Error Handling:** Configuration, protocol and simulation error types.

/// Address decoding (set index, tag, block alignment).
pub mod addr;

/// Trace record types.
pub mod data;

/// Error types.
pub mod error;

pub use addr::Geometry;
pub use data::{AccessKind, BranchOp, MemOp, ProcessorId, RequestTag};
pub use error::{ConfigError, ProtocolError, SimError};
