//! Two-bit saturating counter.

/// A 2-bit saturating counter in `{0, 1, 2, 3}`.
///
/// The high bit is the prediction: 2 and 3 predict taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SaturatingCounter(u8);

impl SaturatingCounter {
    /// Largest counter value (strongly taken).
    pub const MAX: u8 = 3;

    /// Weakly not-taken, the reset state of every table entry.
    pub const WEAKLY_NOT_TAKEN: Self = Self(1);

    /// Creates a counter, saturating `value` at [`MAX`](Self::MAX).
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Raw counter value.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether the counter predicts taken.
    #[inline]
    pub const fn predicts_taken(self) -> bool {
        (self.0 >> 1) & 1 == 1
    }

    /// Moves one step towards taken (`true`) or not-taken (`false`).
    #[inline]
    pub const fn train(&mut self, taken: bool) {
        if taken {
            if self.0 < Self::MAX {
                self.0 += 1;
            }
        } else if self.0 > 0 {
            self.0 -= 1;
        }
    }
}

impl Default for SaturatingCounter {
    fn default() -> Self {
        Self::WEAKLY_NOT_TAKEN
    }
}
