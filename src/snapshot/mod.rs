// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Crash-safe publication of rendered search state.
//!
//! A commit writes `<out>.tmp`, moves any existing `<out>` aside to
//! `<out>.del`, renames the temp file over `<out>` and then removes the
//! stale copy. Readers of `<out>` see either the previous complete snapshot
//! or the new one, never a partial write.
//!
//! The whole sequence is retried after a short pause when it fails: a few
//! times for in-progress snapshots, many more for the final one. Exhausting
//! the retries is logged and reported as `false`; it never stops a search.

pub mod report;

pub use report::{FileSink, MemorySink, ReportFormat, RequestSummary, ResultSink, SearchReport};

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::freq::constants::{FINAL_SNAPSHOT_RETRIES, SNAPSHOT_RETRIES, SNAPSHOT_RETRY_DELAY};

#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    del_path: PathBuf,
    retry_delay: Duration,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            tmp_path: with_suffix(&path, ".tmp"),
            del_path: with_suffix(&path, ".del"),
            path,
            retry_delay: SNAPSHOT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// The published output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn temp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Publish `rendered` at the output path.
    ///
    /// Returns false once every attempt has failed.
    pub fn commit(&self, rendered: &str, is_final: bool) -> bool {
        let attempts = if is_final {
            FINAL_SNAPSHOT_RETRIES
        } else {
            SNAPSHOT_RETRIES
        };
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.write_and_relocate(rendered) {
                Ok(()) => {
                    debug!(path = %self.path.display(), attempt, is_final, "snapshot committed");
                    return true;
                }
                Err(err) => {
                    debug!(path = %self.path.display(), attempt, error = %err, "snapshot attempt failed");
                    last_error = Some(err);
                }
            }
            if attempt < attempts {
                thread::sleep(self.retry_delay);
            }
        }
        warn!(
            path = %self.path.display(),
            attempts,
            error = %last_error.map(|err| err.to_string()).unwrap_or_default(),
            "giving up on snapshot"
        );
        false
    }

    fn write_and_relocate(&self, rendered: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.tmp_path, rendered)?;
        if let Err(err) = fs::rename(&self.path, &self.del_path) {
            if err.kind() != io::ErrorKind::NotFound {
                debug!(
                    path = %self.path.display(),
                    error = %err,
                    "could not move previous snapshot aside"
                );
            }
        }
        fs::rename(&self.tmp_path, &self.path)?;
        if let Err(err) = fs::remove_file(&self.del_path) {
            if err.kind() != io::ErrorKind::NotFound {
                debug!(path = %self.del_path.display(), error = %err, "stale snapshot left behind");
            }
        }
        Ok(())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_paths() {
        let writer = SnapshotWriter::new("out/r1.json");
        assert_eq!(writer.temp_path(), Path::new("out/r1.json.tmp"));
        assert_eq!(writer.del_path, PathBuf::from("out/r1.json.del"));
    }

    #[test]
    fn test_commit_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.txt");
        let writer = SnapshotWriter::new(&path);
        assert!(writer.commit("first", false));
        assert!(writer.commit("second", true));
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!writer.temp_path().exists());
        assert!(!writer.del_path.exists());
    }

    #[test]
    fn test_commit_survives_blocked_move_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let writer = SnapshotWriter::new(&path).with_retry_delay(Duration::ZERO);
        assert!(writer.commit("first", false));
        // A non-empty directory where the stale copy would go.
        fs::create_dir(&writer.del_path).unwrap();
        fs::write(writer.del_path.join("keep"), "x").unwrap();

        assert!(writer.commit("second", false));
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(writer.del_path.join("keep").exists());
    }

    #[test]
    fn test_commit_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        // The parent "blocker" is a file, so nothing can be created beneath it.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let writer =
            SnapshotWriter::new(blocker.join("results.txt")).with_retry_delay(Duration::ZERO);
        assert!(!writer.commit("data", false));
    }
}
