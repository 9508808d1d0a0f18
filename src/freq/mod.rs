// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Frequency values and the small set utilities built on them.
//!
//! A frequency is a plain `i32` in MHz. Valid request values lie within
//! `[MIN_DISP_FREQ, MAX_DISP_FREQ]`.

pub mod constants;
pub mod mask;
pub mod set_ops;

pub use constants::*;
pub use mask::PoolMask;
pub use set_ops::{
    contains, format_freqs, is_separation_valid, min_separation, parse_freq, parse_freq_list,
    set_difference, sort_dedup,
};
