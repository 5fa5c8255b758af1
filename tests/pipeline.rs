//! Integration tests for the markdown-to-OPML pipeline.
//!
//! Each test works in its own directory under the system temp dir and
//! exercises the library end-to-end: read, extract, map, write.

use std::path::{Path, PathBuf};

use md2opml::feed::FeedRecord;
use md2opml::{convert, run, PipelineError, RunOptions};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("md2opml_it_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn options(dir: &Path) -> RunOptions {
    RunOptions {
        input: dir.join("README.md"),
        output: dir.join("feeds.opml"),
        title: "RSS Feeds".to_string(),
    }
}

const README: &str = "\
# Top RSS List

Some introduction text with a [link](https://example.com).

## Tech

| Name | URL | Notes |
|------|-----|-------|
| Hacker News | https://news.ycombinator.com/rss | daily |
| Lobsters | [feed](https://lobste.rs/rss) | |

## Science

| Name | URL |
|------|-----|
| Nature | https://www.nature.com/nature.rss |
| incomplete | |
";

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_two_rows_in_order() {
    let source = "| Name | URL |\n|---|---|\n| A | http://a |\n| B | http://b |\n";
    let records = convert(source.as_bytes()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "A");
    assert_eq!(records[0].url, "http://a");
    assert_eq!(records[0].kind, "rss");
    assert_eq!(records[1].name, "B");
    assert_eq!(records[1].url, "http://b");
    assert_eq!(records[1].kind, "rss");
}

#[test]
fn test_single_column_rows_are_skipped() {
    let source = "| Name |\n|---|\n| A |\n| B |\n";
    assert!(convert(source.as_bytes()).unwrap().is_empty());
}

#[test]
fn test_short_row_in_wide_table_is_skipped() {
    let source = "| Name | URL |\n|---|---|\n| A |\n| B | http://b |\n";
    assert_eq!(
        convert(source.as_bytes()).unwrap(),
        vec![FeedRecord::new("B", "http://b")]
    );
}

#[test]
fn test_link_cell_uses_destination() {
    let source = "| Name | URL |\n|---|---|\n| X | [click here](http://x) |\n";
    let records = convert(source.as_bytes()).unwrap();
    assert_eq!(records, vec![FeedRecord::new("X", "http://x")]);
}

#[test]
fn test_zero_tables_is_empty_not_error() {
    let records = convert(b"# Title\n\nNo tables at all.\n").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_multiple_tables_flattened() {
    let records = convert(README.as_bytes()).unwrap();
    assert_eq!(
        records,
        vec![
            FeedRecord::new("Hacker News", "https://news.ycombinator.com/rss"),
            FeedRecord::new("Lobsters", "https://lobste.rs/rss"),
            FeedRecord::new("Nature", "https://www.nature.com/nature.rss"),
        ]
    );
}

#[test]
fn test_duplicates_preserved() {
    let source = "| Name | URL |\n|---|---|\n| A | http://a |\n| A | http://a |\n";
    assert_eq!(convert(source.as_bytes()).unwrap().len(), 2);
}

// ============================================================================
// File edges
// ============================================================================

#[test]
fn test_run_writes_opml() {
    let dir = test_dir("run_writes");
    let opts = options(&dir);
    std::fs::write(&opts.input, README).unwrap();

    let summary = run(&opts).unwrap();
    assert_eq!(summary.records, 3);
    assert_eq!(summary.output, opts.output);

    let content = std::fs::read_to_string(&opts.output).unwrap();
    assert!(content.starts_with("<?xml"));
    assert!(content.contains(r#"<opml version="2.0">"#));
    assert!(content.contains("<title>RSS Feeds</title>"));
    assert!(content.contains(
        r#"<outline text="Hacker News" type="rss" xmlUrl="https://news.ycombinator.com/rss"/>"#
    ));
    assert_eq!(content.matches("<outline ").count(), 3);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_run_is_idempotent() {
    let dir = test_dir("idempotent");
    let opts = options(&dir);
    std::fs::write(&opts.input, README).unwrap();

    run(&opts).unwrap();
    let first = std::fs::read(&opts.output).unwrap();
    run(&opts).unwrap();
    let second = std::fs::read(&opts.output).unwrap();
    assert_eq!(first, second);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_run_custom_title() {
    let dir = test_dir("custom_title");
    let mut opts = options(&dir);
    opts.title = "My Feeds".to_string();
    std::fs::write(&opts.input, "no tables").unwrap();

    let summary = run(&opts).unwrap();
    assert_eq!(summary.records, 0);
    let content = std::fs::read_to_string(&opts.output).unwrap();
    assert!(content.contains("<title>My Feeds</title>"));
    assert!(!content.contains("<outline"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_input_leaves_output_untouched() {
    let dir = test_dir("missing_input");
    let opts = options(&dir);
    std::fs::write(&opts.output, "previous output").unwrap();

    let err = run(&opts).unwrap_err();
    assert!(matches!(err, PipelineError::Read { .. }));
    assert!(err.to_string().starts_with("Error reading file"));
    assert_eq!(
        std::fs::read_to_string(&opts.output).unwrap(),
        "previous output"
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_utf8_leaves_output_untouched() {
    let dir = test_dir("invalid_utf8");
    let opts = options(&dir);
    std::fs::write(&opts.input, [0xff, 0xfe, 0x00, 0x7c]).unwrap();
    std::fs::write(&opts.output, "previous output").unwrap();

    let err = run(&opts).unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
    assert_eq!(
        std::fs::read_to_string(&opts.output).unwrap(),
        "previous output"
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unwritable_output_reports_write_error() {
    let dir = test_dir("unwritable");
    let mut opts = options(&dir);
    std::fs::write(&opts.input, README).unwrap();
    opts.output = dir.join("missing-subdir").join("feeds.opml");

    let err = run(&opts).unwrap_err();
    assert!(matches!(err, PipelineError::Write { .. }));
    assert!(err.to_string().starts_with("Error writing"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_render_matches_written_file() {
    let dir = test_dir("render_matches");
    let opts = options(&dir);
    std::fs::write(&opts.input, README).unwrap();

    let rendered = md2opml::pipeline::render(&opts).unwrap();
    run(&opts).unwrap();
    assert_eq!(rendered, std::fs::read_to_string(&opts.output).unwrap());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_render_writes_no_output_file() {
    let dir = test_dir("render_no_file");
    let opts = options(&dir);
    std::fs::write(&opts.input, README).unwrap();

    let rendered = md2opml::pipeline::render(&opts).unwrap();
    assert_eq!(rendered.matches("<outline ").count(), 3);
    assert!(!opts.output.exists());

    let mut entries: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    entries.sort();
    assert_eq!(entries, vec![std::ffi::OsString::from("README.md")]);

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Properties
// ============================================================================

fn cell() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 .-]{0,15}[A-Za-z0-9]"
}

proptest! {
    #[test]
    fn prop_every_data_row_becomes_a_record(
        rows in prop::collection::vec((cell(), cell()), 0..12)
    ) {
        let mut source = String::from("| Name | URL |\n|---|---|\n");
        for (name, url) in &rows {
            source.push_str(&format!("| {} | {} |\n", name, url));
        }

        let records = convert(source.as_bytes()).unwrap();
        prop_assert_eq!(records.len(), rows.len());
        for (record, (name, url)) in records.iter().zip(rows.iter()) {
            prop_assert_eq!(&record.name, name);
            prop_assert_eq!(&record.url, url);
        }

        // Same input, same output.
        prop_assert_eq!(convert(source.as_bytes()).unwrap(), records);
    }
}
