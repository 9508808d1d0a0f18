// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context combining the fixed plan and the per-run state.
//!
//! - Tier 1: the validated `SearchPlan`, immutable for the whole run
//! - Tier 2: the ranked result list, counters and latest progress estimate
//!
//! Everything the driver mutates lives here rather than in the driver
//! itself, so a context can be inspected after (or between) runs.

pub mod plan;

pub use plan::{SearchPlan, SearchRequest};

use crate::freq::constants::NUM_RESULTS_SAVED;
use crate::freq::PoolMask;
use crate::imd;
use crate::ranking::{Admission, ResultEntry, TopK};
use crate::state::{Counters, Progress, Statistics};

#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Fixed search parameters (Tier 1)
    pub plan: SearchPlan,
    /// Best sets found so far (Tier 2)
    pub tracker: TopK,
    pub statistics: Statistics,
    pub progress: Progress,
}

impl SearchContext {
    pub fn new(plan: SearchPlan) -> Self {
        Self::with_capacity(plan, NUM_RESULTS_SAVED)
    }

    pub fn with_capacity(plan: SearchPlan, capacity: usize) -> Self {
        Self {
            plan,
            tracker: TopK::new(capacity),
            statistics: Statistics::new(),
            progress: Progress::default(),
        }
    }

    /// Filter, rate and offer one enumerated subset.
    ///
    /// Returns `None` when the subset fails the separation filter.
    pub fn consider(&mut self, mask: PoolMask, subset: Vec<i32>) -> Option<Admission> {
        if !self.plan.is_valid_subset(&subset) {
            self.statistics.increment(Counters::Invalid);
            return None;
        }
        let rating = imd::rating_of(&subset);
        self.statistics.increment(Counters::Rated);
        let sequence = self.statistics.get(Counters::Rated);
        let admission = self
            .tracker
            .offer(ResultEntry::new(rating, sequence, mask, subset));
        match &admission {
            Admission::Rejected => {}
            Admission::Inserted => self.statistics.increment(Counters::Admitted),
            Admission::Evicted { .. } => {
                self.statistics.increment(Counters::Admitted);
                self.statistics.increment(Counters::Evicted);
            }
        }
        Some(admission)
    }
}
