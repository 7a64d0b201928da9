//! Address decoding for set-associative geometries.
//!
//! This module splits a byte address into the fields a set-associative cache
//! indexes by. It provides the following:
//! 1. **Set Selection:** `set_index(addr) = (addr / block_size) mod num_sets`.
//! 2. **Tag Extraction:** `tag(addr) = addr / (block_size * num_sets)`.
//! 3. **Block Alignment:** `block_align(addr) = addr & !(block_size - 1)`.
//! 4. **Reconstruction:** Rebuilding a block address from a resident `(set, tag)` pair.
//!
//! Block size and set count are powers of two, so every field is a shift and a mask.

/// Power-of-two cache geometry used to decode byte addresses.
///
/// Constructed from `log2` values, which makes a non-power-of-two geometry
/// unrepresentable. Bounds on the exponents are checked by
/// [`CacheConfig::validate`](crate::config::CacheConfig::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    set_bits: u32,
    block_bits: u32,
}

impl Geometry {
    /// Creates a geometry with `2^set_bits` sets of `2^block_bits`-byte blocks.
    ///
    /// # Arguments
    ///
    /// * `set_bits` - `log2` of the number of sets.
    /// * `block_bits` - `log2` of the block size in bytes.
    #[inline]
    pub const fn new(set_bits: u32, block_bits: u32) -> Self {
        Self {
            set_bits,
            block_bits,
        }
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Block size in bytes.
    #[inline]
    pub const fn block_size(&self) -> usize {
        1 << self.block_bits
    }

    /// Returns the set an address maps to.
    #[inline(always)]
    pub const fn set_index(&self, addr: u64) -> usize {
        ((addr >> self.block_bits) & ((1u64 << self.set_bits) - 1)) as usize
    }

    /// Returns the tag stored for an address.
    #[inline(always)]
    pub const fn tag(&self, addr: u64) -> u64 {
        addr >> (self.block_bits + self.set_bits)
    }

    /// Clears the block-offset bits of an address.
    #[inline(always)]
    pub const fn block_align(&self, addr: u64) -> u64 {
        addr & !((1u64 << self.block_bits) - 1)
    }

    /// Rebuilds the block-aligned address of a line resident in `set` with `tag`.
    ///
    /// This is the inverse of [`set_index`](Self::set_index) and [`tag`](Self::tag):
    /// for any address `a`, `block_address(set_index(a), tag(a)) == block_align(a)`.
    #[inline]
    pub const fn block_address(&self, set: usize, tag: u64) -> u64 {
        ((tag << self.set_bits) | set as u64) << self.block_bits
    }
}
