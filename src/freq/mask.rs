// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! PoolMask type for representing a subset of the candidate pool as a bitset.
//!
//! Bit i (counting from LSB) is set if the candidate at pool position i is
//! selected. The enumeration cursor is exactly such a mask.
//!
//! # Examples
//!
//! ```
//! use freqset_search::freq::PoolMask;
//!
//! let pool = [5645, 5685, 5760, 5800];
//! let mask = PoolMask::from_bits(0b1010);
//!
//! assert_eq!(mask.len(), 2);
//! assert_eq!(mask.select(&pool), vec![5685, 5800]);
//! assert_eq!(mask.to_binary(4), "1010");
//! ```

use serde::{Deserialize, Serialize};

/// A set of pool positions represented as a bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolMask(u64);

impl PoolMask {
    /// Create an empty mask.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create a mask from a raw bit value.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Mask with the lowest `count` positions set.
    ///
    /// `count` must be below 64.
    pub const fn lowest(count: usize) -> Self {
        Self((1u64 << count) - 1)
    }

    /// Check if a pool position is selected.
    pub fn contains(self, position: usize) -> bool {
        position < 64 && (self.0 >> position) & 1 != 0
    }

    /// Number of selected positions (population count).
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Iterate over selected positions in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        PoolMaskIter { bits: self.0 }
    }

    /// The pool values at the selected positions, ascending if `pool` is.
    pub fn select(self, pool: &[i32]) -> Vec<i32> {
        self.iter()
            .take_while(|&position| position < pool.len())
            .map(|position| pool[position])
            .collect()
    }

    /// Binary form, left-padded with zeros to `width` digits.
    pub fn to_binary(self, width: usize) -> String {
        format!("{:0width$b}", self.0, width = width)
    }
}

/// Iterator over the set positions of a PoolMask.
///
/// Uses trailing-zero counts, so each step costs one instruction
/// regardless of the gap between set bits.
struct PoolMaskIter {
    bits: u64,
}

impl Iterator for PoolMaskIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let position = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mask = PoolMask::empty();
        assert!(mask.is_empty());
        assert_eq!(mask.len(), 0);
        assert_eq!(mask.iter().count(), 0);
    }

    #[test]
    fn test_lowest() {
        assert_eq!(PoolMask::lowest(3).bits(), 0b111);
        assert_eq!(PoolMask::lowest(62).len(), 62);
    }

    #[test]
    fn test_contains() {
        let mask = PoolMask::from_bits(0b101);
        assert!(mask.contains(0));
        assert!(!mask.contains(1));
        assert!(mask.contains(2));
        assert!(!mask.contains(64));
    }

    #[test]
    fn test_iter_ascending() {
        let mask = PoolMask::from_bits((1 << 61) | (1 << 7) | 1);
        let positions: Vec<_> = mask.iter().collect();
        assert_eq!(positions, vec![0, 7, 61]);
    }

    #[test]
    fn test_select() {
        let pool = [5645, 5685, 5760, 5800, 5860];
        assert_eq!(PoolMask::from_bits(0b10011).select(&pool), vec![5645, 5685, 5860]);
    }

    #[test]
    fn test_select_ignores_positions_beyond_pool() {
        let pool = [5645, 5685];
        assert_eq!(PoolMask::from_bits(0b110).select(&pool), vec![5685]);
    }

    #[test]
    fn test_binary_padding() {
        assert_eq!(PoolMask::from_bits(0b101).to_binary(6), "000101");
        assert_eq!(PoolMask::from_bits(0b101).to_binary(2), "101");
    }
}
