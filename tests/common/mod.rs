// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use freqset_search::snapshot::{ResultSink, SearchReport};
use freqset_search::{
    run_search_with, CancellationToken, DriverConfig, MemorySink, SearchOutcome, SearchRequest,
};

/// Candidate pool used by the small end-to-end scenarios.
pub const SMALL_POOL: [i32; 6] = [5645, 5685, 5760, 5800, 5860, 5905];

/// 62 candidates 16MHz apart, the widest pool a request may use.
pub fn full_width_pool() -> Vec<i32> {
    (0..62).map(|i| 5100 + 16 * i).collect()
}

/// Run a request with default tuning and collect every published report.
pub fn run_collecting(request: &SearchRequest) -> (SearchOutcome, MemorySink) {
    run_collecting_with(request, DriverConfig::default(), &CancellationToken::new())
}

pub fn run_collecting_with(
    request: &SearchRequest,
    config: DriverConfig,
    cancel: &CancellationToken,
) -> (SearchOutcome, MemorySink) {
    let mut sink = MemorySink::new();
    let outcome = run_search_with(request, config, None, &mut sink, cancel);
    (outcome, sink)
}

/// A sink that refuses every report.
#[derive(Debug, Default)]
pub struct RefusingSink {
    pub attempts: usize,
}

impl ResultSink for RefusingSink {
    fn publish(&mut self, _report: &SearchReport, _is_final: bool) -> bool {
        self.attempts += 1;
        false
    }
}

/// True when every adjacent pair of the sorted set is at least `gap` apart.
pub fn spaced_at_least(freqs: &[i32], gap: i32) -> bool {
    freqs.windows(2).all(|pair| pair[1] - pair[0] >= gap)
}
