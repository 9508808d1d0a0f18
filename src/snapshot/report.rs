// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Structured search reports and the sinks that publish them.
//!
//! The driver only produces `SearchReport` values. How they are stored or
//! displayed is up to a `ResultSink`: `FileSink` renders JSON or plain text
//! and commits it through a `SnapshotWriter`, `MemorySink` keeps them.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use tracing::warn;

use crate::context::SearchPlan;
use crate::engine::DriverState;
use crate::freq::format_freqs;
use crate::ranking::ResultEntry;
use crate::snapshot::SnapshotWriter;
use crate::state::Progress;

/// The request as the search understood it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    pub set_size: usize,
    pub candidates: Vec<i32>,
    pub mandatory: Vec<i32>,
    pub min_separation: i32,
    pub max_run_time_secs: u64,
    pub pool_size: usize,
    /// Largest enumeration cursor, `2^pool_size - 1`.
    pub search_space: u64,
}

impl From<&SearchPlan> for RequestSummary {
    fn from(plan: &SearchPlan) -> Self {
        Self {
            set_size: plan.set_size,
            candidates: plan.pool.clone(),
            mandatory: plan.mandatory.clone(),
            min_separation: plan.min_separation,
            max_run_time_secs: plan.max_run_time_secs,
            pool_size: plan.pool_size(),
            search_space: plan.cursor_max,
        }
    }
}

/// Everything a sink needs to show the state of a search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// Absent when the request never validated.
    pub request: Option<RequestSummary>,
    pub state: DriverState,
    pub percent_done: u32,
    pub eta_secs: Option<u64>,
    pub elapsed_ms: u64,
    pub message: Option<String>,
    /// Best first.
    pub entries: Vec<ResultEntry>,
}

impl SearchReport {
    pub fn new(
        request: Option<RequestSummary>,
        state: DriverState,
        progress: &Progress,
        message: Option<String>,
        entries: Vec<ResultEntry>,
    ) -> Self {
        Self {
            request,
            state,
            percent_done: progress.percent_done,
            eta_secs: progress.eta_secs,
            elapsed_ms: progress.elapsed.as_millis() as u64,
            message,
            entries,
        }
    }

    /// A final report for a request rejected before searching.
    pub fn failure(message: String) -> Self {
        Self::new(
            None,
            DriverState::Failed,
            &Progress::default(),
            Some(message),
            Vec::new(),
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text layout: request header, status line, one line per entry.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(request) = &self.request {
            let _ = writeln!(out, "Number of frequencies: {}", request.set_size);
            let _ = writeln!(out, "Possible frequencies: {}", format_freqs(&request.candidates));
            if !request.mandatory.is_empty() {
                let _ = writeln!(out, "Mandatory frequencies: {}", format_freqs(&request.mandatory));
            }
            let _ = writeln!(out, "Minimum separation: {}MHz", request.min_separation);
            let _ = writeln!(out, "Maximum run time: {} seconds", request.max_run_time_secs);
            let _ = writeln!(
                out,
                "Number of possible frequencies: {} (2^{}={})",
                request.pool_size, request.pool_size, request.search_space
            );
            out.push('\n');
        }
        let _ = writeln!(out, "{}", self.status_line());
        if !self.entries.is_empty() {
            out.push('\n');
            for entry in &self.entries {
                let _ = writeln!(out, "{}", entry);
            }
        }
        out
    }

    /// The message if there is one, otherwise a progress or completion line.
    pub fn status_line(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        if self.state.is_terminal() {
            format!("Completed; process run time: {}", self.elapsed_text())
        } else {
            let remaining = match self.eta_secs {
                Some(secs) if secs > 0 => format!("{} seconds", secs),
                _ => "(unknown)".to_string(),
            };
            format!(
                "Generation in progress ({}) {}% complete, time remaining: {}",
                self.elapsed_text(),
                self.percent_done,
                remaining
            )
        }
    }

    fn elapsed_text(&self) -> String {
        if self.elapsed_ms > 5000 {
            format!("{} seconds", self.elapsed_ms / 1000)
        } else {
            format!("{} ms", self.elapsed_ms)
        }
    }
}

/// Receives reports from the driver.
pub trait ResultSink {
    /// Publish a report; `is_final` marks the last one of a run.
    ///
    /// Returns false when the report could not be stored.
    fn publish(&mut self, report: &SearchReport, is_final: bool) -> bool;
}

/// Output layouts for `FileSink`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Text,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }

    pub fn render(self, report: &SearchReport) -> serde_json::Result<String> {
        match self {
            ReportFormat::Json => report.to_json(),
            ReportFormat::Text => Ok(report.to_text()),
        }
    }
}

/// Renders reports and commits them to a single output file.
#[derive(Debug, Clone)]
pub struct FileSink {
    writer: SnapshotWriter,
    format: ReportFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self::with_writer(SnapshotWriter::new(path), format)
    }

    pub fn with_writer(writer: SnapshotWriter, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    pub fn writer(&self) -> &SnapshotWriter {
        &self.writer
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }
}

impl ResultSink for FileSink {
    fn publish(&mut self, report: &SearchReport, is_final: bool) -> bool {
        match self.format.render(report) {
            Ok(rendered) => self.writer.commit(&rendered, is_final),
            Err(err) => {
                warn!(error = %err, "could not render report");
                false
            }
        }
    }
}

/// Keeps every published report in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    reports: Vec<(SearchReport, bool)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every report with its `is_final` flag, oldest first.
    pub fn reports(&self) -> &[(SearchReport, bool)] {
        &self.reports
    }

    pub fn last(&self) -> Option<&SearchReport> {
        self.reports.last().map(|(report, _)| report)
    }

    pub fn final_report(&self) -> Option<&SearchReport> {
        self.reports
            .iter()
            .rev()
            .find(|(_, is_final)| *is_final)
            .map(|(report, _)| report)
    }
}

impl ResultSink for MemorySink {
    fn publish(&mut self, report: &SearchReport, is_final: bool) -> bool {
        self.reports.push((report.clone(), is_final));
        true
    }
}
