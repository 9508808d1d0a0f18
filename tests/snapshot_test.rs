// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Snapshot publication through the file system.

mod common;

use std::fs;

use common::SMALL_POOL;
use freqset_search::{
    run_search, CancellationToken, DriverState, FileSink, ReportFormat, SearchRequest,
    SnapshotWriter,
};

#[test]
fn test_commit_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let writer = SnapshotWriter::new(&path);
    let rendered = "{\"state\": \"searching\"}\n";

    assert!(writer.commit(rendered, false));
    let first = fs::read(&path).unwrap();
    assert!(writer.commit(rendered, false));
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, rendered.as_bytes());
}

#[test]
fn test_leftover_temp_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");
    let writer = SnapshotWriter::new(&path);
    fs::write(writer.temp_path(), "stale partial write").unwrap();

    assert!(writer.commit("fresh", true));
    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    assert!(!writer.temp_path().exists());
}

#[test]
fn test_json_file_sink_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fsgresults").join("r1.json");
    let request = SearchRequest::new(5, SMALL_POOL.to_vec()).with_min_separation(20);
    let mut sink = FileSink::new(&path, ReportFormat::Json);

    let outcome = run_search(&request, None, &mut sink, &CancellationToken::new());
    assert_eq!(outcome.state, DriverState::Completed);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["state"], "completed");
    assert_eq!(json["percent_done"], 100);
    assert_eq!(json["request"]["set_size"], 5);
    assert_eq!(json["request"]["pool_size"], 6);
    assert_eq!(json["request"]["search_space"], 63);
    assert_eq!(json["entries"].as_array().unwrap().len(), 6);
    assert_eq!(json["entries"][0]["rating"], outcome.entries[0].rating);
    assert!(json["message"].is_null());
}

#[test]
fn test_text_file_sink_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r2.txt");
    let request = SearchRequest::new(3, vec![5645, 5685, 7000]);
    let mut sink = FileSink::new(&path, ReportFormat::Text);

    let outcome = run_search(&request, None, &mut sink, &CancellationToken::new());
    assert_eq!(outcome.state, DriverState::Failed);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "Error:  Possible-frequency value too high (7000)\n");
}

#[test]
fn test_text_file_sink_lists_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r3.txt");
    let request = SearchRequest::new(3, vec![5645, 5685, 5760, 5800, 5860])
        .with_mandatory(vec![5905])
        .with_min_separation(20);
    let mut sink = FileSink::new(&path, ReportFormat::Text);

    let outcome = run_search(&request, None, &mut sink, &CancellationToken::new());
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.starts_with("Number of frequencies: 3\n"));
    assert!(text.contains("Mandatory frequencies: 5905\n"));
    assert!(text.contains("Number of possible frequencies: 5 (2^5=31)\n"));
    assert!(text.contains("Completed; process run time: "));
    for entry in &outcome.entries {
        assert!(text.contains(&format!("{}\n", entry)));
    }
}
