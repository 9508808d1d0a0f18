// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search for radio-frequency sets with minimal third-order intermodulation.
//!
//! Given a pool of candidate frequencies (MHz), an optional set of mandatory
//! frequencies and a minimum spacing, the search examines every subset of the
//! requested size, rates each one by how closely its `2*a - b` products land
//! on its own members, and keeps the best few.
//!
//! # Architecture
//!
//! The search context uses a two-tier model:
//!
//! ## Tier 1: the plan (immutable)
//!
//! A validated `SearchPlan`: sorted, disjoint candidate and mandatory lists
//! plus the derived subset size and cursor range.
//!
//! ## Tier 2: the run state (mutable)
//!
//! - `TopK` - the bounded ranked result list
//! - `Statistics` - counters
//! - `Progress` - the latest completion estimate
//!
//! # Search
//!
//! `SubsetEnumerator` walks the pool bitmasks of the right population count.
//! For each subset the `SearchDriver` applies the spacing filter, rates it
//! with `imd::rating_of` and offers it to the tracker. At paced time checks
//! it polls the `CancellationToken`, refreshes the progress estimate,
//! enforces the run-time ceiling and publishes a `SearchReport` to a
//! `ResultSink`. `FileSink` commits reports through the crash-safe
//! `SnapshotWriter`.
//!
//! ```
//! use freqset_search::{run_search, CancellationToken, DriverState, MemorySink, SearchRequest};
//!
//! let request = SearchRequest::new(5, vec![5645, 5685, 5760, 5800, 5860, 5905])
//!     .with_min_separation(20);
//! let mut sink = MemorySink::new();
//! let outcome = run_search(&request, None, &mut sink, &CancellationToken::new());
//!
//! assert_eq!(outcome.state, DriverState::Completed);
//! assert!(!outcome.entries.is_empty());
//! ```

pub mod context;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod freq;
pub mod imd;
pub mod logging;
pub mod ranking;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use context::{SearchContext, SearchPlan, SearchRequest};
pub use engine::{
    run_search, run_search_with, CancellationToken, DriverConfig, DriverState, ProcessCensus,
    SearchDriver, SearchOutcome,
};
pub use enumerate::SubsetEnumerator;
pub use error::{ConfigError, FreqSetError, FreqSetResult, ParseError};
pub use imd::{rate, rating_of, ImdTable};
pub use ranking::{Admission, ResultEntry, TopK};
pub use snapshot::{FileSink, MemorySink, ReportFormat, ResultSink, SearchReport, SnapshotWriter};
