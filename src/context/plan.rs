// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search requests and the validated plan derived from them.
//!
//! A `SearchRequest` is raw caller input: lists may be unsorted, contain
//! duplicates or overlap. `validate` normalises it and applies every check
//! before any enumeration, producing a `SearchPlan` that stays fixed for
//! the whole run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::census::ProcessCensus;
use crate::enumerate::SubsetEnumerator;
use crate::error::{ConfigError, FreqSetError, FreqSetResult, ParseError};
use crate::freq::constants::{
    DEF_MAX_RUN_TIME_SECS, DEF_MIN_FREQ_SEP, MAX_DISP_FREQ, MAX_INSTANCE_COUNT,
    MAX_POOL_SIZE, MAX_RUN_TIME_LIMIT_SECS, MIN_DISP_FREQ, PROGRAM_ID,
};
use crate::freq::{is_separation_valid, set_difference, sort_dedup, PoolMask};

/// Caller input for one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchRequest {
    /// Number of frequencies in each generated set.
    pub set_size: usize,
    pub candidates: Vec<i32>,
    /// Frequencies forced into every generated set.
    pub mandatory: Vec<i32>,
    pub min_separation: i32,
    pub max_run_time_secs: u64,
    /// Refuse to start when too many generator processes are running.
    pub check_instances: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            set_size: 0,
            candidates: Vec::new(),
            mandatory: Vec::new(),
            min_separation: DEF_MIN_FREQ_SEP,
            max_run_time_secs: DEF_MAX_RUN_TIME_SECS,
            check_instances: false,
        }
    }
}

impl SearchRequest {
    pub fn new(set_size: usize, candidates: Vec<i32>) -> Self {
        Self {
            set_size,
            candidates,
            ..Self::default()
        }
    }

    pub fn with_mandatory(mut self, mandatory: Vec<i32>) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn with_min_separation(mut self, min_separation: i32) -> Self {
        self.min_separation = min_separation;
        self
    }

    pub fn with_max_run_time_secs(mut self, secs: u64) -> Self {
        self.max_run_time_secs = secs;
        self
    }

    pub fn with_check_instances(mut self, check: bool) -> Self {
        self.check_instances = check;
        self
    }

    /// Parse a request from JSON text. Missing fields take their defaults.
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self, ParseError> {
        serde_json::from_str(text).map_err(|err| ParseError::MalformedRequest {
            path: origin.to_path_buf(),
            detail: err.to_string(),
        })
    }

    pub fn from_json_file(path: &Path) -> FreqSetResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| FreqSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json_str(&text, path)?)
    }

    /// Check the request and derive the plan.
    ///
    /// Checks run in a fixed order and the first failure is reported.
    /// The census is only consulted when `check_instances` is set.
    pub fn validate(&self, census: Option<&dyn ProcessCensus>) -> Result<SearchPlan, ConfigError> {
        let result = self.checked_plan(census);
        if let Err(err) = &result {
            warn!(error = %err, "search request rejected");
        }
        result
    }

    fn checked_plan(&self, census: Option<&dyn ProcessCensus>) -> Result<SearchPlan, ConfigError> {
        let mut pool = sort_dedup(&self.candidates);
        let mandatory = sort_dedup(&self.mandatory);
        let n = self.set_size;

        if n < 2 {
            return Err(ConfigError::SetSizeTooSmall {
                requested: n as i64,
            });
        }
        if let (Some(&lowest), Some(&highest)) = (mandatory.first(), mandatory.last()) {
            if mandatory.len() >= n {
                return Err(ConfigError::TooManyMandatory {
                    mandatory: mandatory.len(),
                    requested: n,
                });
            }
            if lowest < MIN_DISP_FREQ {
                return Err(ConfigError::MandatoryTooLow(lowest));
            }
            if highest > MAX_DISP_FREQ {
                return Err(ConfigError::MandatoryTooHigh(highest));
            }
            if !is_separation_valid(&mandatory, self.min_separation) {
                return Err(ConfigError::MandatorySpacingTooTight {
                    min_separation: self.min_separation,
                });
            }
            pool = set_difference(&pool, &mandatory);
        }

        if pool.len() > MAX_POOL_SIZE {
            return Err(ConfigError::TooManyCandidates {
                count: pool.len(),
                max: MAX_POOL_SIZE,
            });
        }
        let (lowest, highest) = match (pool.first(), pool.last()) {
            (Some(&lowest), Some(&highest)) => (lowest, highest),
            _ => return Err(ConfigError::TooFewCandidates),
        };
        if lowest < MIN_DISP_FREQ {
            return Err(ConfigError::CandidateTooLow(lowest));
        }
        if highest > MAX_DISP_FREQ {
            return Err(ConfigError::CandidateTooHigh(highest));
        }
        let available = mandatory.len() + pool.len();
        if n >= available {
            return Err(ConfigError::SetSizeTooLarge {
                requested: n,
                available,
            });
        }
        if self.max_run_time_secs > MAX_RUN_TIME_LIMIT_SECS {
            return Err(ConfigError::RunTimeOutOfRange {
                requested: self.max_run_time_secs,
                max: MAX_RUN_TIME_LIMIT_SECS,
            });
        }
        if self.check_instances {
            match census {
                Some(census) => {
                    let running = census.count_instances(PROGRAM_ID);
                    if running > MAX_INSTANCE_COUNT {
                        return Err(ConfigError::TooManyInstances {
                            running,
                            limit: MAX_INSTANCE_COUNT,
                        });
                    }
                }
                None => warn!("instance check requested but no process census supplied; skipping"),
            }
        }

        let test_count = n - mandatory.len();
        let cursor_max = PoolMask::lowest(pool.len()).bits();
        debug!(
            set_size = n,
            pool_size = pool.len(),
            mandatory = mandatory.len(),
            test_count,
            cursor_max,
            "search request accepted"
        );
        Ok(SearchPlan {
            set_size: n,
            pool,
            mandatory,
            min_separation: self.min_separation,
            max_run_time_secs: self.max_run_time_secs,
            test_count,
            cursor_max,
        })
    }
}

/// A validated request: sorted, disjoint lists plus derived sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPlan {
    pub set_size: usize,
    /// Candidate pool with mandatory values removed.
    pub pool: Vec<i32>,
    pub mandatory: Vec<i32>,
    pub min_separation: i32,
    pub max_run_time_secs: u64,
    /// Pool values picked per subset, `set_size - mandatory.len()`.
    pub test_count: usize,
    /// `2^pool.len() - 1`.
    pub cursor_max: u64,
}

impl SearchPlan {
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// A fresh enumerator over this plan's subsets.
    pub fn enumerator(&self) -> SubsetEnumerator {
        SubsetEnumerator::new(self.pool.clone(), self.mandatory.clone(), self.test_count)
    }

    /// The separation filter applied to every enumerated subset.
    pub fn is_valid_subset(&self, subset: &[i32]) -> bool {
        is_separation_valid(subset, self.min_separation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::census::FixedCensus;

    const POOL: [i32; 6] = [5645, 5685, 5760, 5800, 5860, 5905];

    fn request(n: usize) -> SearchRequest {
        SearchRequest::new(n, POOL.to_vec()).with_min_separation(20)
    }

    #[test]
    fn test_valid_request_normalises_lists() {
        let plan = SearchRequest::new(3, vec![5905, 5645, 5800, 5645, 5685])
            .with_mandatory(vec![5800, 5800])
            .validate(None)
            .unwrap();
        assert_eq!(plan.pool, vec![5645, 5685, 5905]);
        assert_eq!(plan.mandatory, vec![5800]);
        assert_eq!(plan.test_count, 2);
        assert_eq!(plan.cursor_max, 0b111);
    }

    #[test]
    fn test_set_size_too_small() {
        assert_eq!(
            request(1).validate(None),
            Err(ConfigError::SetSizeTooSmall { requested: 1 })
        );
    }

    #[test]
    fn test_mandatory_not_smaller_than_set() {
        let err = request(2)
            .with_mandatory(vec![5100, 5200])
            .validate(None)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooManyMandatory {
                mandatory: 2,
                requested: 2
            }
        );
    }

    #[test]
    fn test_mandatory_range_and_spacing() {
        assert_eq!(
            request(3).with_mandatory(vec![5000]).validate(None),
            Err(ConfigError::MandatoryTooLow(5000))
        );
        assert_eq!(
            request(3).with_mandatory(vec![6100]).validate(None),
            Err(ConfigError::MandatoryTooHigh(6100))
        );
        assert_eq!(
            request(3).with_mandatory(vec![5200, 5210]).validate(None),
            Err(ConfigError::MandatorySpacingTooTight { min_separation: 20 })
        );
    }

    #[test]
    fn test_pool_checks() {
        let wide: Vec<i32> = (0..63).map(|i| 5100 + 10 * i).collect();
        assert_eq!(
            SearchRequest::new(3, wide).validate(None),
            Err(ConfigError::TooManyCandidates { count: 63, max: 62 })
        );
        assert_eq!(
            SearchRequest::new(3, vec![]).validate(None),
            Err(ConfigError::TooFewCandidates)
        );
        assert_eq!(
            SearchRequest::new(2, vec![5000, 5800, 5900]).validate(None),
            Err(ConfigError::CandidateTooLow(5000))
        );
        assert_eq!(
            SearchRequest::new(2, vec![5800, 5900, 6100]).validate(None),
            Err(ConfigError::CandidateTooHigh(6100))
        );
    }

    #[test]
    fn test_overlap_removed_before_pool_checks() {
        // Only the mandatory value remains after stripping overlaps.
        assert_eq!(
            SearchRequest::new(2, vec![5800])
                .with_mandatory(vec![5800])
                .validate(None),
            Err(ConfigError::TooFewCandidates)
        );
    }

    #[test]
    fn test_set_size_must_leave_a_choice() {
        assert_eq!(
            request(6).validate(None),
            Err(ConfigError::SetSizeTooLarge {
                requested: 6,
                available: 6
            })
        );
        assert!(request(5).validate(None).is_ok());
    }

    #[test]
    fn test_run_time_ceiling() {
        assert!(request(3).with_max_run_time_secs(600).validate(None).is_ok());
        assert_eq!(
            request(3).with_max_run_time_secs(601).validate(None),
            Err(ConfigError::RunTimeOutOfRange {
                requested: 601,
                max: 600
            })
        );
    }

    #[test]
    fn test_instance_check_uses_census_only_when_asked() {
        let busy = FixedCensus(4);
        assert!(request(3).validate(Some(&busy)).is_ok());
        assert_eq!(
            request(3).with_check_instances(true).validate(Some(&busy)),
            Err(ConfigError::TooManyInstances {
                running: 4,
                limit: 3
            })
        );
        assert!(request(3)
            .with_check_instances(true)
            .validate(Some(&FixedCensus(3)))
            .is_ok());
    }

    #[test]
    fn test_instance_check_without_census_is_skipped() {
        assert!(request(3).with_check_instances(true).validate(None).is_ok());
    }

    #[test]
    fn test_json_defaults() {
        let req = SearchRequest::from_json_str(
            r#"{"set_size": 4, "candidates": [5645, 5685, 5760, 5800, 5860]}"#,
            Path::new("request.json"),
        )
        .unwrap();
        assert_eq!(req.min_separation, DEF_MIN_FREQ_SEP);
        assert_eq!(req.max_run_time_secs, DEF_MAX_RUN_TIME_SECS);
        assert!(req.mandatory.is_empty());
    }

    #[test]
    fn test_json_unknown_field_rejected() {
        let err = SearchRequest::from_json_str(r#"{"size": 4}"#, Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequest { .. }));
    }

    #[test]
    fn test_enumerator_covers_plan() {
        let plan = request(5).validate(None).unwrap();
        assert_eq!(plan.enumerator().count(), 6);
        assert!(plan.is_valid_subset(&[5645, 5685]));
        assert!(!plan.is_valid_subset(&[5645, 5660]));
    }
}
