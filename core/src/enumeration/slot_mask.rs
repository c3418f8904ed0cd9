//! Fixed-width party slot bitmask

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use serde::{Deserialize, Serialize};

use crate::world::MAX_PARTY_SIZE;

/// Set of party slots, one bit per slot.
///
/// Slots outside `0..MAX_PARTY_SIZE` are never set; setting one is a no-op.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotMask(pub u64);

impl SlotMask {
    pub const EMPTY: SlotMask = SlotMask(0);

    pub fn single(slot: usize) -> Self {
        let mut mask = Self::EMPTY;
        mask.set(slot);
        mask
    }

    #[inline]
    pub fn set(&mut self, slot: usize) {
        if slot < MAX_PARTY_SIZE {
            self.0 |= 1 << slot;
        }
    }

    #[inline]
    pub fn clear(&mut self, slot: usize) {
        if slot < MAX_PARTY_SIZE {
            self.0 &= !(1 << slot);
        }
    }

    #[inline]
    pub fn is_set(&self, slot: usize) -> bool {
        slot < MAX_PARTY_SIZE && self.0 & (1 << slot) != 0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + use<> {
        let bits = self.0;
        (0..MAX_PARTY_SIZE).filter(move |slot| bits & (1 << slot) != 0)
    }

    /// Lowest set slot
    pub fn first(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as usize)
    }
}

impl fmt::Debug for SlotMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<usize> for SlotMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = SlotMask::EMPTY;
        for slot in iter {
            mask.set(slot);
        }
        mask
    }
}

impl BitOr for SlotMask {
    type Output = SlotMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        SlotMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for SlotMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SlotMask {
    type Output = SlotMask;
    fn bitand(self, rhs: Self) -> Self::Output {
        SlotMask(self.0 & rhs.0)
    }
}

impl BitAndAssign for SlotMask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for SlotMask {
    type Output = SlotMask;
    fn not(self) -> Self::Output {
        SlotMask(!self.0)
    }
}
