use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::Location;

/// A compact set of board cells, one bit per cell.
///
/// Used for the coins remaining on the board as well as for sets of legal
/// destinations. Allows intersection/union with other such sets via bitwise
/// ops, and iterates over its cells in row-major order:
///
/// ```
/// use collect_coins::{CellSet, Location};
/// let mut set = CellSet::new();
/// // This is an immutable data type, so functions like `insert` return a new `CellSet`.
/// set = set.insert(Location::new(3, 1));
/// set = set.insert(Location::new(0, 7));
/// set = set.insert(Location::new(0, 7)); // Inserting a second time has no effect
/// assert_eq!(
///     Vec::from_iter(set),
///     vec![Location::new(0, 7), Location::new(3, 1)]
/// );
/// ```
///
/// Locations that are off the board are never contained, and inserting
/// them has no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellSet {
    // Bit `row * 8 + col` is set iff the cell is in the set.
    bits: u64,
}

impl CellSet {
    /// Creates a new, empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// The set of all 64 cells.
    pub const fn full() -> Self {
        Self { bits: u64::MAX }
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, location: Location) -> bool {
        match location.to_index() {
            Some(idx) => self.bits & (1u64 << idx) != 0,
            None => false,
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn insert(self, location: Location) -> Self {
        match location.to_index() {
            Some(idx) => Self {
                bits: self.bits | (1u64 << idx),
            },
            None => self,
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn remove(self, location: Location) -> Self {
        match location.to_index() {
            Some(idx) => Self {
                bits: self.bits & !(1u64 << idx),
            },
            None => self,
        }
    }

    /// One flag per cell, in row-major order.
    pub fn to_flags(self) -> Vec<bool> {
        Location::all().map(|loc| self.contains(loc)).collect()
    }
}

impl std::ops::BitAnd for CellSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl std::ops::BitOr for CellSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl std::ops::Not for CellSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self { bits: !self.bits }
    }
}

impl std::ops::BitAndAssign for CellSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl std::ops::BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl Default for CellSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Location> for CellSet {
    fn from_iter<T: IntoIterator<Item = Location>>(iter: T) -> Self {
        iter.into_iter().fold(CellSet::new(), CellSet::insert)
    }
}

impl IntoIterator for CellSet {
    type Item = Location;

    type IntoIter = CellSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CellSetIter { bits: self.bits }
    }
}

/// Iterator for a [`CellSet`] that returns cells in row-major order.
#[derive(Clone, Copy, Debug)]
pub struct CellSetIter {
    bits: u64,
}

impl Iterator for CellSetIter {
    type Item = Location;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            // The number of trailing zeros is the index of the first cell
            let idx = self.bits.trailing_zeros() as u8;
            self.bits ^= 1u64 << idx;
            Some(Location::from_index(idx))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bits.count_ones() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for CellSetIter {
    fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

impl FusedIterator for CellSetIter {}
