// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Counting concurrently running generator processes.
//!
//! Only consulted when a request asks for the instance check.

use std::process::Command;

use tracing::debug;

/// Reports how many instances of a program are currently running.
pub trait ProcessCensus {
    fn count_instances(&self, program: &str) -> usize;
}

/// Census taken from the system process listing.
///
/// Counts occurrences of the program id in the output of `ps -Af`
/// (`tasklist /V` on Windows). Any failure to list processes counts as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct PsCensus;

impl PsCensus {
    fn listing() -> Option<String> {
        let output = if cfg!(windows) {
            Command::new("tasklist").arg("/V").output()
        } else {
            Command::new("ps").arg("-Af").output()
        };
        match output {
            Ok(output) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            Err(err) => {
                debug!(error = %err, "process listing unavailable");
                None
            }
        }
    }
}

impl ProcessCensus for PsCensus {
    fn count_instances(&self, program: &str) -> usize {
        Self::listing()
            .map(|listing| count_occurrences(&listing, program))
            .unwrap_or(0)
    }
}

/// A census with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedCensus(pub usize);

impl ProcessCensus for FixedCensus {
    fn count_instances(&self, _program: &str) -> usize {
        self.0
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
