// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable per-run state: counters and progress pacing.

pub mod progress;
pub mod statistics;

pub use progress::{Progress, TimeCheckPacer};
pub use statistics::{Counters, Statistics};
