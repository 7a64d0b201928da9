//! Cache line storage.
//!
//! A [`CacheSet`] is a fixed array of [`CacheLine`] slots. Lines start invalid and
//! zeroed; they become valid when a miss selects them as the victim. The data
//! buffer is allocated per line but its contents are a placeholder: the model
//! tracks presence and ordering, not bytes.

use crate::common::error::SimError;

/// One way of a set.
#[derive(Clone, Debug)]
pub struct CacheLine {
    pub(crate) valid: bool,
    pub(crate) dirty: bool,
    pub(crate) tag: u64,
    /// Distance since last use under LRU; 0 is most recently used.
    pub(crate) recency: u32,
    /// Re-reference prediction value under RRIP; higher is evicted sooner.
    pub(crate) rrpv: u8,
    data: Box<[u8]>,
}

impl CacheLine {
    fn new(block_size: usize) -> Result<Self, SimError> {
        let mut data = Vec::new();
        data.try_reserve_exact(block_size)
            .map_err(|source| SimError::Allocation {
                what: "cache line buffer",
                source,
            })?;
        data.resize(block_size, 0);
        Ok(Self {
            valid: false,
            dirty: false,
            tag: 0,
            recency: 0,
            rrpv: 0,
            data: data.into_boxed_slice(),
        })
    }

    /// Whether the line holds a block.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the line has been written since it was filled.
    ///
    /// Only the dirty-eviction count reads this; there is no write-back path.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tag of the resident block. Meaningless while invalid.
    #[inline]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// LRU recency counter.
    #[inline]
    pub const fn recency(&self) -> u32 {
        self.recency
    }

    /// RRIP re-reference prediction value.
    #[inline]
    pub const fn rrpv(&self) -> u8 {
        self.rrpv
    }

    /// Placeholder data buffer of one block.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Installs `tag`, replacing whatever the line held.
    ///
    /// Replacement metadata is left to the policy.
    pub const fn fill(&mut self, tag: u64, dirty: bool) {
        self.valid = true;
        self.tag = tag;
        self.dirty = dirty;
    }

    #[inline]
    pub(crate) const fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}

/// A fixed-size, ordered group of lines sharing a set index.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    /// Allocates `ways` invalid lines of `block_size` bytes each.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Allocation`] if line storage cannot be reserved.
    pub fn new(ways: usize, block_size: usize) -> Result<Self, SimError> {
        let mut lines = Vec::new();
        lines
            .try_reserve_exact(ways)
            .map_err(|source| SimError::Allocation {
                what: "cache set",
                source,
            })?;
        for _ in 0..ways {
            lines.push(CacheLine::new(block_size)?);
        }
        Ok(Self { lines })
    }

    /// All ways in order.
    #[inline]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// All ways in order, for a replacement policy to update.
    #[inline]
    pub fn lines_mut(&mut self) -> &mut [CacheLine] {
        &mut self.lines
    }

    /// Returns the way holding `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.holds(tag))
    }

    /// Number of valid lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }
}
