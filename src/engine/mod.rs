// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Time-boxed search driver.
//!
//! The driver pulls subsets from the enumerator, filters them by spacing,
//! rates them and offers them to the ranked list held in the
//! `SearchContext`. It stops when:
//! - the enumerator is exhausted (`Completed`)
//! - the list is full of perfect ratings and another perfect one arrives (`Saturated`)
//! - the run-time ceiling is exceeded (`TimedOut`)
//! - the cancellation token is set (`Terminated`)
//!
//! The clock and the token are only consulted at time checks, paced by a
//! `TimeCheckPacer`. Roughly once per interval the driver also refreshes the
//! progress estimate and publishes an in-progress report. Every run ends
//! with exactly one final report, whatever the terminal state.
//!
//! # Example
//!
//! ```
//! use freqset_search::context::{SearchContext, SearchRequest};
//! use freqset_search::engine::{CancellationToken, DriverConfig, DriverState, SearchDriver};
//! use freqset_search::snapshot::MemorySink;
//!
//! let plan = SearchRequest::new(3, vec![5645, 5685, 5760, 5800, 5860])
//!     .with_min_separation(20)
//!     .validate(None)
//!     .unwrap();
//! let mut ctx = SearchContext::new(plan);
//! let mut sink = MemorySink::new();
//!
//! // The driver is consumed by a run.
//! let driver = SearchDriver::new(DriverConfig::default(), CancellationToken::new());
//! let outcome = driver.run(&mut ctx, &mut sink);
//!
//! assert_eq!(outcome.state, DriverState::Completed);
//! assert_eq!(outcome.entries.len(), 10);
//! ```

pub mod cancel;
pub mod census;

pub use cancel::{install_signal_handler, CancellationToken, SignalListener};
pub use census::{FixedCensus, ProcessCensus, PsCensus};

use std::time::{Duration, Instant};

use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, info};

use crate::context::{SearchContext, SearchRequest};
use crate::error::FreqSetError;
use crate::freq::constants::{
    MAX_CHECK_THRESHOLD, NUM_RESULTS_SAVED, RATING_MAX_VALUE, TIME_CHECK_INTERVAL,
};
use crate::ranking::{Admission, ResultEntry};
use crate::snapshot::{RequestSummary, ResultSink, SearchReport};
use crate::state::{Counters, Progress, Statistics, TimeCheckPacer};

/// Lifecycle of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DriverState {
    Initializing,
    Searching,
    /// Every subset was examined.
    Completed,
    /// Stopped early: all kept entries have the best attainable rating.
    Saturated,
    TimedOut,
    Terminated,
    /// The request was rejected; nothing was searched.
    Failed,
}

impl DriverState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DriverState::Initializing | DriverState::Searching)
    }
}

/// Tuning knobs for the driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Size of the ranked result list.
    pub capacity: usize,
    /// How often progress is sampled and published.
    pub time_check_interval: Duration,
    /// Cap on iterations between two time checks.
    pub max_check_threshold: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            capacity: NUM_RESULTS_SAVED,
            time_check_interval: TIME_CHECK_INTERVAL,
            max_check_threshold: MAX_CHECK_THRESHOLD,
        }
    }
}

/// Result of a run, mirrored by the final report.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub state: DriverState,
    /// Best first.
    pub entries: Vec<ResultEntry>,
    pub progress: Progress,
    pub statistics: Statistics,
    pub message: Option<String>,
}

impl SearchOutcome {
    fn failed(message: String) -> Self {
        Self {
            state: DriverState::Failed,
            entries: Vec::new(),
            progress: Progress::default(),
            statistics: Statistics::new(),
            message: Some(message),
        }
    }
}

pub struct SearchDriver {
    config: DriverConfig,
    cancel: CancellationToken,
    state: DriverState,
}

impl SearchDriver {
    pub fn new(config: DriverConfig, cancel: CancellationToken) -> Self {
        Self {
            config,
            cancel,
            state: DriverState::Initializing,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Search the plan held by `ctx` until a terminal state is reached.
    ///
    /// Consumes the driver: a run cannot be resumed. Results accumulate in
    /// `ctx` and are also returned in the outcome.
    pub fn run(mut self, ctx: &mut SearchContext, sink: &mut dyn ResultSink) -> SearchOutcome {
        let start = Instant::now();
        let mut enumerator = ctx.plan.enumerator();
        let mut pacer = TimeCheckPacer::new(
            start,
            self.config.time_check_interval,
            self.config.max_check_threshold,
        );

        self.transition(DriverState::Searching);
        self.publish(ctx, sink, None);

        let mut message = None;
        let final_state = loop {
            let Some(subset) = enumerator.next() else {
                break DriverState::Completed;
            };
            let admission = ctx.consider(enumerator.mask(), subset);
            if let Some(Admission::Evicted {
                saturated: true, ..
            }) = admission
            {
                message = Some(format!(
                    "IMD rating of all saved frequency sets is {}; stopping",
                    RATING_MAX_VALUE
                ));
                break DriverState::Saturated;
            }

            if !pacer.tick() {
                continue;
            }
            ctx.statistics.increment(Counters::TimeChecks);
            if self.cancel.is_cancelled() {
                break DriverState::Terminated;
            }
            let now = Instant::now();
            if !pacer.sample_due(now, ctx.statistics.examined()) {
                continue;
            }
            ctx.progress = Progress::estimate(
                enumerator.cursor(),
                enumerator.cursor_max(),
                now.duration_since(start),
            );
            debug!(
                percent = ctx.progress.percent_done,
                eta_secs = ?ctx.progress.eta_secs,
                rated = ctx.statistics.get(Counters::Rated),
                invalid = ctx.statistics.get(Counters::Invalid),
                threshold = pacer.threshold(),
                "time check"
            );
            if ctx.progress.elapsed_secs() > ctx.plan.max_run_time_secs {
                break DriverState::TimedOut;
            }
            self.publish(ctx, sink, None);
        };

        ctx.progress = Progress::estimate(
            enumerator.cursor(),
            enumerator.cursor_max(),
            start.elapsed(),
        );
        match final_state {
            DriverState::TimedOut => {
                message = Some(format!(
                    "Maximum run time reached; stopping processing ({}%)",
                    ctx.progress.percent_done
                ));
            }
            DriverState::Terminated => {
                message = Some(format!(
                    "Generator terminated; stopping processing ({}%)",
                    ctx.progress.percent_done
                ));
            }
            _ => {}
        }

        self.transition(final_state);
        self.publish(ctx, sink, message.clone());
        info!(
            state = %final_state,
            rated = ctx.statistics.get(Counters::Rated),
            invalid = ctx.statistics.get(Counters::Invalid),
            kept = ctx.tracker.len(),
            elapsed_ms = ctx.progress.elapsed.as_millis() as u64,
            "search finished"
        );

        SearchOutcome {
            state: final_state,
            entries: ctx.tracker.snapshot(),
            progress: ctx.progress,
            statistics: ctx.statistics.clone(),
            message,
        }
    }

    fn transition(&mut self, next: DriverState) {
        debug!(from = %self.state, to = %next, "driver state change");
        self.state = next;
    }

    /// Send the current state to the sink; final once the driver is terminal.
    fn publish(&self, ctx: &mut SearchContext, sink: &mut dyn ResultSink, message: Option<String>) {
        let is_final = self.state.is_terminal();
        let report = SearchReport::new(
            Some(RequestSummary::from(&ctx.plan)),
            self.state,
            &ctx.progress,
            message,
            ctx.tracker.snapshot(),
        );
        if sink.publish(&report, is_final) {
            ctx.statistics.increment(Counters::SnapshotsCommitted);
        } else {
            ctx.statistics.increment(Counters::SnapshotFailures);
        }
    }
}

/// Validate `request` and run a full search with the default configuration.
///
/// A rejected request publishes a single final error report and returns a
/// `Failed` outcome without enumerating anything. With no `census`, a
/// requested instance check is skipped with a warning.
pub fn run_search(
    request: &SearchRequest,
    census: Option<&dyn ProcessCensus>,
    sink: &mut dyn ResultSink,
    cancel: &CancellationToken,
) -> SearchOutcome {
    run_search_with(request, DriverConfig::default(), census, sink, cancel)
}

pub fn run_search_with(
    request: &SearchRequest,
    config: DriverConfig,
    census: Option<&dyn ProcessCensus>,
    sink: &mut dyn ResultSink,
    cancel: &CancellationToken,
) -> SearchOutcome {
    let plan = match request.validate(census) {
        Ok(plan) => plan,
        Err(err) => {
            let message = FreqSetError::from(err).status_message();
            info!(state = %DriverState::Failed, %message, "search not started");
            sink.publish(&SearchReport::failure(message.clone()), true);
            return SearchOutcome::failed(message);
        }
    };
    info!(
        set_size = plan.set_size,
        pool_size = plan.pool_size(),
        search_space = plan.cursor_max,
        max_run_time_secs = plan.max_run_time_secs,
        "search starting"
    );
    let mut ctx = SearchContext::with_capacity(plan, config.capacity);
    SearchDriver::new(config, cancel.clone()).run(&mut ctx, sink)
}
