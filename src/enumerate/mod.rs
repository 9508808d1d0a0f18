// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed-size subset enumeration over the candidate pool.
//!
//! The enumerator walks an integer cursor over `P` bits in increasing order and
//! yields every mask whose population count equals `test_count`. The selected
//! pool values are merged with the mandatory set so each yielded subset is
//! sorted and has length `mandatory.len() + test_count`.
//!
//! Masks are visited in increasing binary order, not lexicographic
//! combination order. Order only matters for tie-breaking in the ranking
//! (earlier discovery wins).
//!
//! Instead of incrementing and re-testing the popcount, the cursor jumps
//! straight to the next larger integer with the same popcount. The sequence
//! of masks (and so of cursor values) is identical; the skipped masks are
//! exactly the ones the popcount test would reject.
//!
//! # Example
//!
//! ```
//! use freqset_search::enumerate::SubsetEnumerator;
//!
//! let subsets: Vec<Vec<i32>> =
//!     SubsetEnumerator::new(vec![5645, 5685, 5760], vec![5800], 2).collect();
//! assert_eq!(
//!     subsets,
//!     vec![
//!         vec![5645, 5685, 5800],
//!         vec![5645, 5760, 5800],
//!         vec![5685, 5760, 5800],
//!     ]
//! );
//! ```

use crate::freq::PoolMask;

/// Forward-only iterator over the qualifying subsets of a candidate pool.
#[derive(Debug, Clone)]
pub struct SubsetEnumerator {
    pool: Vec<i32>,
    mandatory: Vec<i32>,
    test_count: usize,
    cursor: u64,
    cursor_max: u64,
    exhausted: bool,
}

impl SubsetEnumerator {
    /// Create an enumerator with the cursor at 0.
    ///
    /// `pool` and `mandatory` must be sorted, deduplicated and disjoint, and
    /// `pool` must hold at most `MAX_POOL_SIZE` values; request validation
    /// guarantees this. A `test_count` of zero or above the pool size
    /// produces no subsets.
    pub fn new(pool: Vec<i32>, mandatory: Vec<i32>, test_count: usize) -> Self {
        debug_assert!(pool.len() < 64, "pool exceeds cursor width");
        let cursor_max = PoolMask::lowest(pool.len()).bits();
        let exhausted = test_count == 0 || test_count > pool.len();
        Self {
            pool,
            mandatory,
            test_count,
            cursor: 0,
            cursor_max,
            exhausted,
        }
    }

    /// Current cursor (the mask of the subset most recently yielded).
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn mask(&self) -> PoolMask {
        PoolMask::from_bits(self.cursor)
    }

    /// Largest cursor value, `2^P - 1`.
    pub fn cursor_max(&self) -> u64 {
        self.cursor_max
    }

    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// Length of every yielded subset.
    pub fn subset_len(&self) -> usize {
        self.mandatory.len() + self.test_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// `cursor / cursor_max`, in `[0, 1]`.
    pub fn completion_ratio(&self) -> f64 {
        if self.cursor_max == 0 {
            return 1.0;
        }
        self.cursor as f64 / self.cursor_max as f64
    }

    /// Move the cursor to the next qualifying mask.
    ///
    /// Returns false (and parks the cursor at its maximum) once past the end.
    fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let next = if self.cursor == 0 {
            Some(PoolMask::lowest(self.test_count).bits())
        } else {
            next_same_popcount(self.cursor)
        };
        match next {
            Some(mask) if mask <= self.cursor_max => {
                self.cursor = mask;
                true
            }
            _ => {
                self.cursor = self.cursor_max;
                self.exhausted = true;
                false
            }
        }
    }

    /// Ordered merge of the selected pool values with the mandatory set.
    fn current_subset(&self) -> Vec<i32> {
        let mut subset = Vec::with_capacity(self.subset_len());
        let mut mandatory = self.mandatory.iter().copied().peekable();
        for position in self.mask().iter() {
            let value = self.pool[position];
            while let Some(m) = mandatory.next_if(|&m| m < value) {
                subset.push(m);
            }
            subset.push(value);
        }
        subset.extend(mandatory);
        subset
    }
}

impl Iterator for SubsetEnumerator {
    type Item = Vec<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            Some(self.current_subset())
        } else {
            None
        }
    }
}

/// Next larger integer with the same number of set bits.
///
/// `x` must be non-zero. Returns `None` only if the result would not fit.
fn next_same_popcount(x: u64) -> Option<u64> {
    let lowest = x & x.wrapping_neg();
    let ripple = x.checked_add(lowest)?;
    Some((((ripple ^ x) >> 2) / lowest) | ripple)
}
