// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Progress estimation and time-check pacing.
//!
//! Reading the clock on every subset is too expensive, so the driver only
//! looks at it after a threshold number of iterations. About once per
//! interval the threshold is recomputed to aim for `CHECKS_PER_INTERVAL`
//! checks per interval, capped at `MAX_CHECK_THRESHOLD`.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::freq::constants::{CHECKS_PER_INTERVAL, MAX_CHECK_THRESHOLD, TIME_CHECK_INTERVAL};

/// Completion estimate at the last sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub percent_done: u32,
    /// Estimated seconds remaining; `None` near 0% or 100% where the estimate is noise.
    pub eta_secs: Option<u64>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl Progress {
    /// Estimate from the enumeration cursor and the time spent so far.
    pub fn estimate(cursor: u64, cursor_max: u64, elapsed: Duration) -> Self {
        let ratio = if cursor_max == 0 {
            1.0
        } else {
            cursor as f64 / cursor_max as f64
        };
        let percent_done = (ratio * 100.0 + 0.5) as u32;
        let ms = elapsed.as_millis() as f64;
        let eta_secs = if ratio > 0.005 && ratio < 1.0 {
            Some(((ms / ratio - ms) / 1000.0 + 0.5) as u64)
        } else {
            None
        };
        Self {
            percent_done,
            eta_secs,
            elapsed,
        }
    }

    /// Whole seconds elapsed, truncated.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }
}

fn serialize_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Decides when the driver should poll the clock and the cancellation flag.
#[derive(Debug, Clone)]
pub struct TimeCheckPacer {
    count: u64,
    threshold: u64,
    interval: Duration,
    max_threshold: u64,
    next_sample: Instant,
    examined_at_last_sample: u64,
}

impl TimeCheckPacer {
    pub fn new(start: Instant, interval: Duration, max_threshold: u64) -> Self {
        Self {
            count: 0,
            threshold: 0,
            interval,
            max_threshold,
            next_sample: start + interval,
            examined_at_last_sample: 0,
        }
    }

    /// Count one iteration; true when a time check is due.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count > self.threshold {
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// True at most once per interval. Retunes the threshold from the number
    /// of subsets examined since the previous sample.
    pub fn sample_due(&mut self, now: Instant, examined: u64) -> bool {
        if now < self.next_sample {
            return false;
        }
        self.next_sample = now + self.interval;
        let recent = examined.saturating_sub(self.examined_at_last_sample);
        self.threshold = (recent / CHECKS_PER_INTERVAL).min(self.max_threshold);
        self.examined_at_last_sample = examined;
        true
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }
}

impl Default for TimeCheckPacer {
    fn default() -> Self {
        Self::new(Instant::now(), TIME_CHECK_INTERVAL, MAX_CHECK_THRESHOLD)
    }
}
