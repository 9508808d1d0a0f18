// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Compile-time constants for frequency-set generation.
//!
//! The display range bounds both the values a caller may submit and the
//! intermod products that count toward a rating. Everything else here is a
//! tuning value for the search driver or the snapshot writer.

use std::time::Duration;

/// Lowest frequency (MHz) accepted in a request and counted by the rating.
pub const MIN_DISP_FREQ: i32 = 5100;

/// Highest frequency (MHz) accepted in a request and counted by the rating.
pub const MAX_DISP_FREQ: i32 = 6099;

/// Best attainable rating.
pub const RATING_MAX_VALUE: i32 = 100;

/// Sensitivity threshold `D`: an intermod product closer than this to a
/// selected frequency is "colored" and costs `(D - distance)^2`.
pub const RATING_DIFF_LIMIT: i64 = 35;

/// A rendered table warns when its tightest spacing is below this.
pub const MIN_FREQ_SEP_WARNING: i32 = 35;

/// Largest candidate pool; the enumeration cursor is a single u64 mask.
pub const MAX_POOL_SIZE: usize = 62;

/// Capacity of the ranked result list.
pub const NUM_RESULTS_SAVED: usize = 25;

/// Minimum separation used when the caller gives none.
pub const DEF_MIN_FREQ_SEP: i32 = 37;

/// Run-time ceiling used when the caller gives none.
pub const DEF_MAX_RUN_TIME_SECS: u64 = 120;

/// Largest run-time ceiling a request may ask for.
pub const MAX_RUN_TIME_LIMIT_SECS: u64 = 600;

/// More concurrent generator processes than this rejects a request
/// that asked for the instance check.
pub const MAX_INSTANCE_COUNT: usize = 3;

/// Commit attempts for an in-progress snapshot.
pub const SNAPSHOT_RETRIES: u32 = 3;

/// Commit attempts for the final snapshot.
pub const FINAL_SNAPSHOT_RETRIES: u32 = 20;

/// Pause between commit attempts.
pub const SNAPSHOT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Wall-clock sampling period of the driver.
pub const TIME_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Cap on iterations between two time checks.
pub const MAX_CHECK_THRESHOLD: u64 = 99;

/// Target number of time checks per sampling period.
pub const CHECKS_PER_INTERVAL: u64 = 10;

/// Program identifier searched for by the process census.
pub const PROGRAM_ID: &str = "freqsetgen";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_range_is_ordered() {
        assert!(MIN_DISP_FREQ < MAX_DISP_FREQ);
    }

    #[test]
    fn test_pool_fits_in_cursor() {
        // The cursor maximum (1 << MAX_POOL_SIZE) - 1 must not overflow,
        // and the next-combination step needs one spare bit above it.
        assert!(MAX_POOL_SIZE < 63);
        let max = (1u64 << MAX_POOL_SIZE) - 1;
        assert_eq!(max.count_ones() as usize, MAX_POOL_SIZE);
    }

    #[test]
    fn test_final_snapshot_retries_harder() {
        assert!(FINAL_SNAPSHOT_RETRIES > SNAPSHOT_RETRIES);
    }
}
