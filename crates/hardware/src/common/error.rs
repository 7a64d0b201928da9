//! Error definitions.
//!
//! This module defines the failure taxonomy of the simulator. It provides:
//! 1. **Configuration Errors:** Geometry or predictor parameters that cannot describe a
//!    meaningful structure. Raised by constructors; the simulation cannot start.
//! 2. **Protocol Errors:** A collaborator broke the request/notification contract
//!    (for example a grant for a request that was never pending). These are
//!    internal-consistency failures, not recoverable conditions.
//! 3. **Simulation Errors:** The umbrella type returned by component entry points,
//!    which also carries I/O, serialization and allocation failures.

use std::collections::TryReserveError;

use thiserror::Error;

use super::data::ProcessorId;

/// Invalid construction-time parameters.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A set must hold at least one line.
    #[error("cache associativity must be at least 1")]
    ZeroAssociativity,

    /// The set and block exponents together must leave room for a tag.
    #[error("geometry of 2^{set_bits} sets x 2^{block_bits}-byte blocks exceeds the 64-bit address space")]
    GeometryTooLarge {
        /// `log2` of the set count.
        set_bits: u32,
        /// `log2` of the block size.
        block_bits: u32,
    },

    /// RRIP was selected without an RRPV width.
    #[error("RRIP replacement requires an RRPV bit width")]
    MissingRrpvBits,

    /// RRPV values are stored in a byte.
    #[error("RRPV bit width {0} is outside 1..=8")]
    RrpvBitsOutOfRange(u32),

    /// At least one processor must issue requests.
    #[error("processor count must be at least 1")]
    ZeroProcessors,

    /// The combined-history model cannot fit the history in the table index.
    #[error("history register width {history_bits} exceeds predictor index width {table_bits}")]
    HistoryExceedsIndex {
        /// Configured history register width.
        history_bits: u32,
        /// Configured `log2` of the predictor table size.
        table_bits: u32,
    },

    /// Predictor table exponent above the supported maximum.
    #[error("predictor table of 2^{0} entries is larger than the supported 2^{max}", max = crate::config::MAX_PREDICTOR_BITS)]
    PredictorTableTooLarge(u32),

    /// Numeric predictor model code with no matching model.
    #[error("unknown branch predictor model code {0}")]
    UnknownPredictorModel(u8),
}

/// Violations of the cache/coherence request contract.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A data-received notification named a `(processor, block)` pair with no
    /// pending request.
    #[error("coherence notification for processor {processor}, block {block:#x} matches no pending request")]
    UnmatchedNotification {
        /// Processor named by the notification.
        processor: ProcessorId,
        /// Block address named by the notification.
        block: u64,
    },

    /// A request arrived while another request for the same `(processor, block)`
    /// was still waiting on coherence permission.
    #[error("processor {processor} already has a pending request for block {block:#x}")]
    DuplicatePending {
        /// Requesting processor.
        processor: ProcessorId,
        /// Block address of both requests.
        block: u64,
    },

    /// A processor index outside the configured processor count.
    #[error("processor {processor} is out of range (configured processors: {processors})")]
    UnknownProcessor {
        /// Offending processor index.
        processor: ProcessorId,
        /// Configured processor count.
        processors: usize,
    },
}

/// Umbrella error for component entry points.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Request/notification contract violation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Line storage or request records could not be allocated.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        /// Structure being allocated.
        what: &'static str,
        /// Underlying allocator error.
        #[source]
        source: TryReserveError,
    },

    /// Writing a report to the output sink failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or report (de)serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Returns the protocol violation, if this is one.
    pub const fn as_protocol(&self) -> Option<&ProtocolError> {
        match self {
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the configuration error, if this is one.
    pub const fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}
