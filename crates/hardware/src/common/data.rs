//! Trace record types.
//!
//! This module defines the records a trace replay driver hands to the components:
//! 1. **Memory Operations:** A load or store to a byte address, consumed by the cache.
//! 2. **Branch Operations:** A branch PC and the PC that actually followed it,
//!    consumed by the branch unit.
//! 3. **Identifiers:** Processor numbers and the opaque request tags callers use to
//!    correlate completions.

/// Index of a simulated processor, in `0..processors`.
pub type ProcessorId = usize;

/// Opaque correlation token supplied by the caller of
/// [`Cache::request`](crate::core::units::cache::Cache::request) and handed back
/// unchanged to the completion callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct RequestTag(pub i64);

/// Kind of memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Data read.
    Load,
    /// Data write. Marks the line dirty.
    Store,
}

impl AccessKind {
    /// Returns `true` for loads; this is the flag passed to the coherence gateway.
    #[inline]
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Load)
    }
}

/// A single memory access from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemOp {
    /// Load or store.
    pub kind: AccessKind,
    /// Byte address accessed.
    pub address: u64,
}

impl MemOp {
    /// A load from `address`.
    pub const fn load(address: u64) -> Self {
        Self {
            kind: AccessKind::Load,
            address,
        }
    }

    /// A store to `address`.
    pub const fn store(address: u64) -> Self {
        Self {
            kind: AccessKind::Store,
            address,
        }
    }
}

/// A resolved branch from a trace.
///
/// The trace carries the PC that actually followed the branch, so the outcome
/// and the taken target are both read from the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchOp {
    /// Address of the branch instruction.
    pub pc: u64,
    /// Address of the instruction executed after the branch.
    pub next_pc: u64,
}

impl BranchOp {
    /// Size of the instruction following a not-taken branch.
    pub const FALLTHROUGH: u64 = 4;

    /// Creates a branch record.
    pub const fn new(pc: u64, next_pc: u64) -> Self {
        Self { pc, next_pc }
    }

    /// Address of the straight-line successor.
    #[inline]
    pub const fn fallthrough(&self) -> u64 {
        self.pc.wrapping_add(Self::FALLTHROUGH)
    }

    /// Whether the branch was taken (control did not fall through).
    #[inline]
    pub const fn taken(&self) -> bool {
        self.next_pc != self.fallthrough()
    }
}
