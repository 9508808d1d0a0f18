// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Small integer-set helpers used by request validation and the driver.
//!
//! Sets here are plain sorted `Vec<i32>`s. They hold at most a few dozen
//! values, so linear scans are fine.

use crate::error::ParseError;
use crate::freq::constants::MAX_DISP_FREQ;

/// Sort ascending and drop duplicate values.
pub fn sort_dedup(values: &[i32]) -> Vec<i32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// `data` minus every value that also appears in `exclude`, order preserved.
pub fn set_difference(data: &[i32], exclude: &[i32]) -> Vec<i32> {
    data.iter()
        .copied()
        .filter(|&value| !contains(exclude, value))
        .collect()
}

/// Linear membership test.
pub fn contains(set: &[i32], value: i32) -> bool {
    set.iter().any(|&v| v == value)
}

/// Smallest gap between adjacent values.
///
/// Returns `2 * MAX_DISP_FREQ` when there are fewer than two values.
pub fn min_separation(values: &[i32], is_sorted: bool) -> i32 {
    let sorted;
    let values = if is_sorted {
        values
    } else {
        let mut copy = values.to_vec();
        copy.sort_unstable();
        sorted = copy;
        &sorted
    };
    values
        .windows(2)
        .map(|pair| i32::try_from(gap(pair[0], pair[1])).unwrap_or(i32::MAX))
        .fold(MAX_DISP_FREQ * 2, i32::min)
}

/// True when every adjacent pair of a sorted set is at least `min_sep` apart.
pub fn is_separation_valid(sorted: &[i32], min_sep: i32) -> bool {
    sorted
        .windows(2)
        .all(|pair| gap(pair[0], pair[1]) >= i64::from(min_sep))
}

// Widened so gaps between extreme values cannot overflow.
fn gap(lower: i32, upper: i32) -> i64 {
    i64::from(upper) - i64::from(lower)
}

/// Space-separated display form, e.g. `"5645 5685 5760"`.
pub fn format_freqs(values: &[i32]) -> String {
    values
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a list of integers separated by runs of spaces, commas or tabs.
///
/// Blank input is an empty list.
pub fn parse_freq_list(text: &str) -> Result<Vec<i32>, ParseError> {
    text.split(|c: char| c == ' ' || c == ',' || c == '\t')
        .filter(|token| !token.is_empty())
        .map(parse_freq)
        .collect()
}

/// Parse a single integer, trimming surrounding whitespace.
pub fn parse_freq(token: &str) -> Result<i32, ParseError> {
    let token = token.trim();
    token.parse().map_err(|source| ParseError::InvalidNumber {
        token: token.to_owned(),
        source,
    })
}
