// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Plain-text rendering of an interference table.
//!
//! ```text
//!          5700  5740  5780
//!   5700          5660
//!   5740  5780*       5700*
//!   ...
//! IMD rating (100=best): -63
//! 5780 is 0MHz away from 5780
//! ```
//!
//! Diagonal and out-of-range cells are blank; colored cells carry a `*`.

use std::fmt;

use crate::freq::constants::{MIN_FREQ_SEP_WARNING, RATING_MAX_VALUE};
use crate::imd::table::{ImdCell, ImdTable};

const CELL_WIDTH: usize = 7;

impl fmt::Display for ImdTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.freqs().len() > 1 && self.min_separation() < MIN_FREQ_SEP_WARNING {
            writeln!(
                f,
                "Warning:  Minimum separation for entered frequencies is {}MHz",
                self.min_separation()
            )?;
            writeln!(f)?;
        }

        write!(f, "{:>width$}", "", width = CELL_WIDTH)?;
        for freq in self.freqs() {
            write!(f, "{:>width$}", freq, width = CELL_WIDTH)?;
        }
        writeln!(f)?;

        for row in self.rows() {
            write!(f, "{:>width$}", row.freq, width = CELL_WIDTH)?;
            for cell in &row.cells {
                write!(f, "{:>width$}", CellText(cell), width = CELL_WIDTH)?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "IMD rating ({}=best): {}", RATING_MAX_VALUE, self.rating())?;
        for row in self.rows() {
            for line in row.info_lines() {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

struct CellText<'a>(&'a ImdCell);

impl fmt::Display for CellText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.0;
        let text = if !cell.is_scored() {
            String::new()
        } else if cell.is_colored() {
            format!("{}*", cell.value)
        } else {
            cell.value.to_string()
        };
        f.pad(&text)
    }
}
