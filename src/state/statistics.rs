// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters kept by the search driver, stored in the context and reported
//! with the outcome of a run.

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

#[derive(EnumCountMacro, EnumIter, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Counters {
    /// Subsets that passed the separation filter and were rated.
    Rated,
    /// Subsets rejected by the separation filter.
    Invalid,
    /// Rated subsets the tracker accepted.
    Admitted,
    /// Tracker members dropped to restore the capacity.
    Evicted,
    TimeChecks,
    SnapshotsCommitted,
    SnapshotFailures,
}

const COUNT: usize = Counters::COUNT;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub fn increment(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Subsets pulled from the enumerator so far, valid or not.
    pub fn examined(&self) -> u64 {
        self.get(Counters::Rated) + self.get(Counters::Invalid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Counters, u64)> + '_ {
        Counters::iter().map(move |counter| (counter, self.get(counter)))
    }
}

impl Serialize for Statistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COUNT))?;
        for (counter, value) in self.iter() {
            let name: &'static str = counter.into();
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut stats = Statistics::new();
        stats.increment(Counters::Rated);
        stats.increment(Counters::Rated);
        stats.increment(Counters::Invalid);
        assert_eq!(stats.get(Counters::Rated), 2);
        assert_eq!(stats.get(Counters::Evicted), 0);
        assert_eq!(stats.examined(), 3);
    }

    #[test]
    fn test_serializes_by_name() {
        let mut stats = Statistics::new();
        stats.increment(Counters::SnapshotsCommitted);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["snapshots_committed"], 1);
        assert_eq!(json["rated"], 0);
        assert_eq!(json.as_object().unwrap().len(), Counters::COUNT);
    }
}
