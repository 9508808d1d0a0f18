// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tracing subscriber setup for the `freqsetgen` binary.
//!
//! Filter priority, highest first:
//!
//! 1. `FREQSETGEN_LOG` (directives, e.g. `freqset_search=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `-v` (debug for this crate) / `-q` (errors only)
//! 4. `warn`
//!
//! Logs go to stderr so stdout stays free for tables and results.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "FREQSETGEN_LOG";

const TARGET_PREFIX: &str = "freqset_search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Verbose wins when both flags are given.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }

    /// Filter directive used when neither environment variable is usable.
    pub fn directive(self) -> String {
        let level = self.default_level();
        if self == Self::Verbose {
            format!("{},{}=debug", Level::WARN, TARGET_PREFIX)
        } else {
            level.to_string()
        }
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_subscriber(verbosity: Verbosity) {
    let filter = build_env_filter(verbosity);
    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true);

    let result = if verbosity == Verbosity::Verbose {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_timer(fmt::time::uptime()))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.without_time().compact())
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV_VAR) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = verbosity.directive();
    EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_level().as_str()))
}
