// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The interference table and its rating.
//!
//! For a frequency list `f` of length `m` the table is an `m x m` grid whose
//! cell `(row, col)` holds the third-order product `2*f[row] - f[col]`.
//! A cell is scored when it is off the diagonal and its product lies in the
//! display range. Each scored cell closer than `RATING_DIFF_LIMIT` to some
//! selected frequency costs `(RATING_DIFF_LIMIT - distance)^2`.
//!
//! ```text
//! rating = RATING_MAX_VALUE - total / (5 * m)     (integer division)
//! ```
//!
//! The rating is not clamped; catastrophic sets (e.g. duplicates) go negative.

use crate::freq::constants::{MAX_DISP_FREQ, MIN_DISP_FREQ, RATING_DIFF_LIMIT, RATING_MAX_VALUE};
use crate::freq::set_ops::min_separation;

/// One cell of the interference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdCell {
    pub row: usize,
    pub col: usize,
    /// Intermod product `2*f[row] - f[col]`.
    pub value: i64,
    /// Index of the selected frequency nearest to `value` (lowest index on ties).
    pub near_index: usize,
    pub near_value: i32,
    /// `|value - near_value|`.
    pub distance: i64,
}

impl ImdCell {
    fn new(freqs: &[i32], row: usize, col: usize) -> Self {
        let value = 2 * i64::from(freqs[row]) - i64::from(freqs[col]);
        let (near_index, distance) = nearest(freqs, value);
        Self {
            row,
            col,
            value,
            near_index,
            near_value: freqs[near_index],
            distance,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.row == self.col
    }

    /// True when the product lies within the display range.
    pub fn is_in_range(&self) -> bool {
        in_display_range(self.value)
    }

    /// True when the product is close enough to a selected frequency to matter.
    pub fn is_colored(&self) -> bool {
        self.distance < RATING_DIFF_LIMIT
    }

    /// True when this cell participates in the rating.
    pub fn is_scored(&self) -> bool {
        !self.is_diagonal() && self.is_in_range()
    }

    /// True when the cell's info line belongs in a rendered table.
    pub fn shows_info(&self) -> bool {
        self.is_scored() && self.is_colored()
    }

    /// Contribution of this cell to its row's rating total.
    pub fn penalty(&self) -> i64 {
        if self.is_scored() {
            penalty(self.distance)
        } else {
            0
        }
    }

    /// Human-readable note, e.g. `"5725 is 5MHz away from 5720"`.
    pub fn info(&self) -> String {
        format!(
            "{} is {}MHz away from {}",
            self.value, self.distance, self.near_value
        )
    }

    /// Background shade for a colored cell as RGB; redder means closer.
    ///
    /// `None` for cells that are not colored or not shown.
    pub fn shade(&self) -> Option<[u8; 3]> {
        if !self.shows_info() {
            return None;
        }
        let level = 255 - (RATING_DIFF_LIMIT - self.distance) * 150 / RATING_DIFF_LIMIT;
        let level = level.clamp(0, 255) as u8;
        Some([255, level, level])
    }
}

/// One row of the table: all products seeded by `freqs[index]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdRow {
    pub index: usize,
    pub freq: i32,
    pub cells: Vec<ImdCell>,
    /// Sum of the row's cell penalties.
    pub rating_total: i64,
}

impl ImdRow {
    fn new(freqs: &[i32], index: usize) -> Self {
        let cells: Vec<ImdCell> = (0..freqs.len())
            .map(|col| ImdCell::new(freqs, index, col))
            .collect();
        let rating_total = cells.iter().map(ImdCell::penalty).sum();
        Self {
            index,
            freq: freqs[index],
            cells,
            rating_total,
        }
    }

    /// Info lines of this row's colored, scored cells.
    pub fn info_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.shows_info())
            .map(ImdCell::info)
    }
}

/// The full interference table for an ordered frequency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdTable {
    freqs: Vec<i32>,
    rows: Vec<ImdRow>,
    rating: i32,
    min_separation: i32,
}

impl ImdTable {
    pub fn freqs(&self) -> &[i32] {
        &self.freqs
    }

    pub fn rows(&self) -> &[ImdRow] {
        &self.rows
    }

    /// Quality rating, `RATING_MAX_VALUE` is best.
    pub fn rating(&self) -> i32 {
        self.rating
    }

    /// Smallest adjacent gap in the (sorted) frequency list.
    pub fn min_separation(&self) -> i32 {
        self.min_separation
    }

    /// Sum of all row totals.
    pub fn rating_total(&self) -> i64 {
        self.rows.iter().map(|row| row.rating_total).sum()
    }

    /// True for the empty table, whose rating carries no information.
    pub fn is_degenerate(&self) -> bool {
        self.freqs.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&ImdCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }
}

/// Build the interference table for `freqs` and rate it.
///
/// Never fails. An empty list yields a degenerate table rated
/// `RATING_MAX_VALUE` with no cells. Duplicates are not removed here.
pub fn rate(freqs: &[i32]) -> ImdTable {
    let rows: Vec<ImdRow> = (0..freqs.len()).map(|i| ImdRow::new(freqs, i)).collect();
    let total: i64 = rows.iter().map(|row| row.rating_total).sum();
    ImdTable {
        freqs: freqs.to_vec(),
        rows,
        rating: rating_from_total(total, freqs.len()),
        min_separation: min_separation(freqs, false),
    }
}

/// The rating `rate(freqs)` would report, without building the table.
///
/// This is the form the search driver uses per candidate.
pub fn rating_of(freqs: &[i32]) -> i32 {
    let mut total = 0i64;
    for (row, &f_row) in freqs.iter().enumerate() {
        for (col, &f_col) in freqs.iter().enumerate() {
            if row == col {
                continue;
            }
            let value = 2 * i64::from(f_row) - i64::from(f_col);
            if in_display_range(value) {
                total += penalty(nearest(freqs, value).1);
            }
        }
    }
    rating_from_total(total, freqs.len())
}

fn rating_from_total(total: i64, m: usize) -> i32 {
    if m == 0 {
        return RATING_MAX_VALUE;
    }
    let scaled = total / 5 / m as i64;
    (i64::from(RATING_MAX_VALUE) - scaled) as i32
}

fn in_display_range(value: i64) -> bool {
    value >= i64::from(MIN_DISP_FREQ) && value <= i64::from(MAX_DISP_FREQ)
}

fn penalty(distance: i64) -> i64 {
    if distance < RATING_DIFF_LIMIT {
        let d = RATING_DIFF_LIMIT - distance;
        d * d
    } else {
        0
    }
}

/// Index and distance of the entry of `freqs` closest to `value`.
fn nearest(freqs: &[i32], value: i64) -> (usize, i64) {
    let mut best = (0, i64::MAX);
    for (i, &f) in freqs.iter().enumerate() {
        let d = (value - i64::from(f)).abs();
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}
