// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! IMD rating engine.
//!
//! Pure computation: given an ordered list of frequencies, build the
//! third-order intermodulation table and derive a rating (higher is better,
//! `RATING_MAX_VALUE` at most).
//!
//! # Example
//!
//! ```
//! use freqset_search::imd;
//!
//! let table = imd::rate(&[5645, 5685, 5760, 5800, 5860]);
//! assert!(table.rating() <= 100);
//! assert_eq!(table.rating(), imd::rating_of(&[5645, 5685, 5760, 5800, 5860]));
//! ```

mod display;
pub mod table;

pub use table::{rate, rating_of, ImdCell, ImdRow, ImdTable};
