//! Configuration system for the cache and branch predictor models.
//!
//! This module defines the configuration structures used to parameterize the
//! components. It provides:
//! 1. **Defaults:** Baseline geometry and predictor sizes.
//! 2. **Structures:** `Config` with one section per component.
//! 3. **Enums:** Replacement policy and branch predictor model selectors.
//! 4. **Validation:** Construction-time checks that reject geometries the models
//!    cannot represent.
//!
//! Configuration is supplied as JSON via [`Config::from_json`] or built in code
//! starting from `Config::default()`.

use serde::Deserialize;

use crate::common::error::{ConfigError, SimError};

/// Largest supported `log2` of the predictor table size.
pub const MAX_PREDICTOR_BITS: u32 = 28;

/// Widest supported RRPV, so that values fit in a `u8`.
pub const MAX_RRPV_BITS: u32 = 8;

/// Default configuration constants.
mod defaults {
    /// Default associativity (lines per set).
    pub const WAYS: usize = 4;

    /// Default `log2` of the set count (64 sets).
    pub const SET_BITS: u32 = 6;

    /// Default `log2` of the block size (64-byte blocks).
    pub const BLOCK_BITS: u32 = 6;

    /// Default number of processors sharing the cache.
    pub const PROCESSORS: usize = 1;

    /// Default `log2` of the predictor table size (1024 counters).
    pub const PREDICTOR_BITS: u32 = 10;

    /// Default global history register width.
    pub const HISTORY_BITS: u32 = 4;
}

/// Cache replacement policy algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used: evicts the line with the largest recency counter.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Re-Reference Interval Prediction: evicts a line predicted to be re-referenced
    /// in the distant future. Requires [`CacheConfig::rrpv_bits`].
    #[serde(alias = "Rrip")]
    Rrip,
}

/// Branch predictor indexing models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PredictorModel {
    /// 2-bit saturating counters indexed by PC bits only.
    #[default]
    #[serde(alias = "counter", alias = "TwoBit")]
    Counter,
    /// Counters indexed by PC bits concatenated with global history bits.
    #[serde(alias = "gselect", alias = "GSELECT")]
    GSelect,
}

impl TryFrom<u8> for PredictorModel {
    type Error = ConfigError;

    /// Converts the numeric model codes used by trace tooling (0 = counter,
    /// 2 = gselect).
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Counter),
            2 => Ok(Self::GSelect),
            other => Err(ConfigError::UnknownPredictorModel(other)),
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Config, ReplacementPolicy};
///
/// let json = r#"{ "cache": { "ways": 2, "set_bits": 0, "block_bits": 6, "policy": "RRIP", "rrpv_bits": 2 } }"#;
/// let config = Config::from_json(json)?;
/// assert_eq!(config.cache.policy, ReplacementPolicy::Rrip);
/// assert_eq!(config.branch.table_bits, 10);
/// # Ok::<(), cachesim_core::common::SimError>(())
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache section.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Branch predictor section.
    #[serde(default)]
    pub branch: BranchConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] for malformed input and [`SimError::Config`] if
    /// either section fails validation.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.branch.validate()
    }
}

/// Set-associative cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Associativity (lines per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// `log2` of the number of sets.
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,

    /// `log2` of the block size in bytes.
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// RRPV width in bits; required when `policy` is RRIP, ignored otherwise.
    #[serde(default)]
    pub rrpv_bits: Option<u32>,

    /// Number of processors issuing requests.
    #[serde(default = "CacheConfig::default_processors")]
    pub processors: usize,
}

impl CacheConfig {
    fn default_ways() -> usize {
        defaults::WAYS
    }

    fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    fn default_processors() -> usize {
        defaults::PROCESSORS
    }

    /// An LRU configuration with the given geometry and a single processor.
    pub const fn lru(ways: usize, set_bits: u32, block_bits: u32) -> Self {
        Self {
            ways,
            set_bits,
            block_bits,
            policy: ReplacementPolicy::Lru,
            rrpv_bits: None,
            processors: defaults::PROCESSORS,
        }
    }

    /// An RRIP configuration with the given geometry and RRPV width.
    pub const fn rrip(ways: usize, set_bits: u32, block_bits: u32, rrpv_bits: u32) -> Self {
        Self {
            ways,
            set_bits,
            block_bits,
            policy: ReplacementPolicy::Rrip,
            rrpv_bits: Some(rrpv_bits),
            processors: defaults::PROCESSORS,
        }
    }

    /// Returns a copy with a different processor count.
    #[must_use]
    pub const fn with_processors(mut self, processors: usize) -> Self {
        self.processors = processors;
        self
    }

    /// Checks that the geometry and policy parameters describe a buildable cache.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroAssociativity`] if `ways == 0`.
    /// - [`ConfigError::GeometryTooLarge`] if `set_bits + block_bits >= 64`.
    /// - [`ConfigError::MissingRrpvBits`] / [`ConfigError::RrpvBitsOutOfRange`] for
    ///   an RRIP policy without a usable width.
    /// - [`ConfigError::ZeroProcessors`] if `processors == 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if self
            .set_bits
            .checked_add(self.block_bits)
            .is_none_or(|bits| bits >= u64::BITS)
        {
            return Err(ConfigError::GeometryTooLarge {
                set_bits: self.set_bits,
                block_bits: self.block_bits,
            });
        }
        if self.policy == ReplacementPolicy::Rrip {
            match self.rrpv_bits {
                None => return Err(ConfigError::MissingRrpvBits),
                Some(bits) if bits == 0 || bits > MAX_RRPV_BITS => {
                    return Err(ConfigError::RrpvBitsOutOfRange(bits));
                }
                Some(_) => {}
            }
        }
        if self.processors == 0 {
            return Err(ConfigError::ZeroProcessors);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::lru(
            defaults::WAYS,
            defaults::SET_BITS,
            defaults::BLOCK_BITS,
        )
    }
}

/// Branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchConfig {
    /// `log2` of the number of counters in the table.
    #[serde(default = "BranchConfig::default_table_bits")]
    pub table_bits: u32,

    /// Width of the global history register (GSelect only).
    #[serde(default = "BranchConfig::default_history_bits")]
    pub history_bits: u32,

    /// Indexing model.
    #[serde(default)]
    pub model: PredictorModel,
}

impl BranchConfig {
    fn default_table_bits() -> u32 {
        defaults::PREDICTOR_BITS
    }

    fn default_history_bits() -> u32 {
        defaults::HISTORY_BITS
    }

    /// A counter-only predictor with `2^table_bits` entries.
    pub const fn counter(table_bits: u32) -> Self {
        Self {
            table_bits,
            history_bits: 0,
            model: PredictorModel::Counter,
        }
    }

    /// A GSelect predictor with `2^table_bits` entries and `history_bits` of history.
    pub const fn gselect(table_bits: u32, history_bits: u32) -> Self {
        Self {
            table_bits,
            history_bits,
            model: PredictorModel::GSelect,
        }
    }

    /// Checks the table size and, for GSelect, that the history fits in the index.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::PredictorTableTooLarge`] above [`MAX_PREDICTOR_BITS`].
    /// - [`ConfigError::HistoryExceedsIndex`] for GSelect with
    ///   `history_bits > table_bits`.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.table_bits > MAX_PREDICTOR_BITS {
            return Err(ConfigError::PredictorTableTooLarge(self.table_bits));
        }
        if matches!(self.model, PredictorModel::GSelect) && self.history_bits > self.table_bits {
            return Err(ConfigError::HistoryExceedsIndex {
                history_bits: self.history_bits,
                table_bits: self.table_bits,
            });
        }
        Ok(())
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            table_bits: defaults::PREDICTOR_BITS,
            history_bits: defaults::HISTORY_BITS,
            model: PredictorModel::Counter,
        }
    }
}
