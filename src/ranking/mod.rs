// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bounded top-K list of rated frequency sets.
//!
//! Entries are ordered best first: higher rating, then earlier discovery
//! (lower sequence number). The tracker keeps at most `capacity` entries.
//!
//! Admission uses a cached bar rather than comparing against every member:
//! while the list is short everything is accepted, afterwards an entry is
//! inserted when its rating is at least the bar, and the worst member is
//! evicted if that overfills the list. The bar is then reset to the rating
//! of the (new) worst member. An entry that ties the bar but loses the
//! sequence tie-break is inserted and immediately evicted.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::freq::constants::RATING_MAX_VALUE;
use crate::freq::{format_freqs, PoolMask};
use crate::imd::{self, ImdTable};

/// One rated frequency set.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEntry {
    pub rating: i32,
    /// Discovery order among rated subsets, starting at 1.
    pub sequence: u64,
    /// Pool positions that produced this set.
    pub mask: PoolMask,
    pub freqs: Vec<i32>,
}

impl ResultEntry {
    pub fn new(rating: i32, sequence: u64, mask: PoolMask, freqs: Vec<i32>) -> Self {
        Self {
            rating,
            sequence,
            mask,
            freqs,
        }
    }

    /// The full interference table for this entry's frequencies.
    pub fn table(&self) -> ImdTable {
        imd::rate(&self.freqs)
    }
}

/// Console form: rating padded to 5, sequence padded to 8, then the set.
impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} {:>8}  {}",
            self.rating,
            self.sequence,
            format_freqs(&self.freqs)
        )
    }
}

impl Ord for ResultEntry {
    /// Best first: rating descending, then sequence ascending.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rating
            .cmp(&self.rating)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for ResultEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ResultEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ResultEntry {}

/// What `TopK::offer` did with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Below the bar with the list already full.
    Rejected,
    /// Added without overfilling the list.
    Inserted,
    /// Added, and the worst member was dropped to restore the capacity.
    Evicted {
        evicted: ResultEntry,
        /// The bar was already `RATING_MAX_VALUE`: every kept entry is perfect.
        saturated: bool,
    },
}

#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    entries: BTreeSet<ResultEntry>,
    admission_bar: i32,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: BTreeSet::new(),
            admission_bar: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Rating an entry needs to be considered once the list is full.
    pub fn admission_bar(&self) -> i32 {
        self.admission_bar
    }

    /// The lowest-ranked member.
    pub fn worst(&self) -> Option<&ResultEntry> {
        self.entries.last()
    }

    pub fn best(&self) -> Option<&ResultEntry> {
        self.entries.first()
    }

    /// True when the list is full and every member has the best attainable rating.
    pub fn is_saturated(&self) -> bool {
        self.is_full()
            && self
                .worst()
                .is_some_and(|worst| worst.rating >= RATING_MAX_VALUE)
    }

    /// Add an entry regardless of the bar. Does not evict.
    pub fn insert(&mut self, entry: ResultEntry) {
        self.entries.insert(entry);
    }

    pub fn evict_worst(&mut self) -> Option<ResultEntry> {
        self.entries.pop_last()
    }

    /// Offer an entry through the admission gate.
    pub fn offer(&mut self, entry: ResultEntry) -> Admission {
        if entry.rating < self.admission_bar && self.entries.len() >= self.capacity {
            return Admission::Rejected;
        }
        let saturated = self.admission_bar >= RATING_MAX_VALUE;
        self.insert(entry);
        let admission = if self.entries.len() > self.capacity {
            match self.evict_worst() {
                Some(evicted) => Admission::Evicted { evicted, saturated },
                None => Admission::Inserted,
            }
        } else {
            Admission::Inserted
        };
        if let Some(worst) = self.worst() {
            self.admission_bar = worst.rating;
        }
        admission
    }

    /// Current members, best first.
    pub fn snapshot(&self) -> Vec<ResultEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rating: i32, sequence: u64) -> ResultEntry {
        ResultEntry::new(rating, sequence, PoolMask::empty(), vec![5645, 5685])
    }

    #[test]
    fn test_order_is_rating_then_sequence() {
        let mut top = TopK::new(5);
        top.offer(entry(80, 3));
        top.offer(entry(90, 4));
        top.offer(entry(80, 1));
        let order: Vec<(i32, u64)> = top.iter().map(|e| (e.rating, e.sequence)).collect();
        assert_eq!(order, vec![(90, 4), (80, 1), (80, 3)]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut top = TopK::new(3);
        for seq in 1..=50u64 {
            top.offer(entry((seq * 37 % 101) as i32 - 20, seq));
            assert!(top.len() <= 3);
        }
        let ratings: Vec<i32> = top.snapshot().iter().map(|e| e.rating).collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_fills_below_bar_while_short() {
        let mut top = TopK::new(2);
        assert_eq!(top.offer(entry(-40, 1)), Admission::Inserted);
        assert_eq!(top.admission_bar(), -40);
        assert_eq!(top.offer(entry(-90, 2)), Admission::Inserted);
        assert_eq!(top.admission_bar(), -90);
        assert!(top.is_full());
    }

    #[test]
    fn test_rejects_below_bar_when_full() {
        let mut top = TopK::new(2);
        top.offer(entry(70, 1));
        top.offer(entry(60, 2));
        assert_eq!(top.offer(entry(59, 3)), Admission::Rejected);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_tie_with_bar_is_inserted_then_evicted() {
        let mut top = TopK::new(2);
        top.offer(entry(70, 1));
        top.offer(entry(60, 2));
        match top.offer(entry(60, 3)) {
            Admission::Evicted { evicted, saturated } => {
                assert_eq!(evicted.sequence, 3);
                assert!(!saturated);
            }
            other => panic!("unexpected admission {:?}", other),
        }
        assert_eq!(top.worst().map(|e| e.sequence), Some(2));
    }

    #[test]
    fn test_better_entry_evicts_worst() {
        let mut top = TopK::new(2);
        top.offer(entry(70, 1));
        top.offer(entry(60, 2));
        match top.offer(entry(95, 3)) {
            Admission::Evicted { evicted, .. } => assert_eq!(evicted.sequence, 2),
            other => panic!("unexpected admission {:?}", other),
        }
        assert_eq!(top.admission_bar(), 70);
        assert_eq!(top.best().map(|e| e.sequence), Some(3));
    }

    #[test]
    fn test_saturation_reported_on_eviction() {
        let mut top = TopK::new(2);
        top.offer(entry(100, 1));
        top.offer(entry(100, 2));
        assert!(top.is_saturated());
        match top.offer(entry(100, 3)) {
            Admission::Evicted { evicted, saturated } => {
                assert!(saturated);
                assert_eq!(evicted.sequence, 3);
            }
            other => panic!("unexpected admission {:?}", other),
        }
    }

    #[test]
    fn test_entry_display() {
        let e = ResultEntry::new(87, 1234, PoolMask::from_bits(0b101), vec![5645, 5760]);
        assert_eq!(e.to_string(), "   87     1234  5645 5760");
    }

    #[test]
    fn test_entry_table_rates_freqs() {
        let e = ResultEntry::new(0, 1, PoolMask::from_bits(0b11), vec![5700, 5740, 5780]);
        assert_eq!(e.table().rating(), -63);
    }
}
