use std::fs;
use std::path::PathBuf;

use pgsread_core::{
    SegmentError, SegmentKind, SegmentSource, SourceError, SupFileSource, inspect_sup_file,
    summarize_sup_file,
};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn sup_source_reads_segments_from_fixture() {
    let mut source = SupFileSource::open(&fixture("two_display_sets.sup")).unwrap();
    assert_eq!(source.len(), 185);

    let mut kinds = Vec::new();
    while let Some(segment) = source.next_segment().unwrap() {
        kinds.push(segment.kind());
    }

    assert_eq!(
        kinds,
        vec![
            SegmentKind::PresentationComposition,
            SegmentKind::WindowDefinition,
            SegmentKind::PaletteDefinition,
            SegmentKind::ObjectDefinition,
            SegmentKind::End,
            SegmentKind::PresentationComposition,
            SegmentKind::WindowDefinition,
            SegmentKind::End,
        ]
    );
}

#[test]
fn sup_source_reports_truncated_object() {
    let mut source = SupFileSource::open(&fixture("truncated_object.sup")).unwrap();
    for _ in 0..3 {
        assert!(source.next_segment().unwrap().is_some());
    }
    let err = source.next_segment().unwrap_err();
    assert!(matches!(
        err,
        SourceError::Decode(SegmentError::TruncatedPayload {
            expected: 8,
            read: 5,
            ..
        })
    ));
}

#[test]
fn sup_source_empty_file_has_no_segments() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("empty.sup");
    fs::write(&path, b"").unwrap();

    let mut source = SupFileSource::open(&path).unwrap();
    assert!(source.is_empty());
    assert!(source.next_segment().unwrap().is_none());
}

#[test]
fn sup_source_missing_file_is_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let err = match SupFileSource::open(&temp.path().join("missing.sup")) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn inspect_fixture_summary() {
    let report = inspect_sup_file(&fixture("two_display_sets.sup")).unwrap();
    assert_eq!(report.input.bytes, 185);
    assert_eq!(report.summary.segments_total, 8);
    assert_eq!(report.summary.display_sets, 2);
    assert_eq!(report.summary.epochs, 1);
    assert_eq!(report.summary.object_data_bytes, 8);
    assert_eq!(report.summary.pts_start, Some(90_000));
    assert_eq!(report.summary.pts_end, Some(270_000));
    assert_eq!(report.segments[0].presentation_time.as_duration().as_secs(), 1);
    assert_eq!(report.segments[0].decoding_time.as_duration().as_millis(), 960);
}

#[test]
fn inspect_truncated_fixture_fails_at_object() {
    let err = inspect_sup_file(&fixture("truncated_object.sup")).unwrap_err();
    assert_eq!(err.decoded(), 3);
}

#[test]
fn summarize_fixture_without_segments() {
    let summary = summarize_sup_file(&fixture("two_display_sets.sup")).unwrap();
    assert_eq!(summary.segments_total, 8);
    assert_eq!(summary.display_sets, 2);
    assert_eq!(summary.object_data_bytes, 8);

    let err = summarize_sup_file(&fixture("truncated_object.sup")).unwrap_err();
    assert_eq!(err.decoded(), 3);
}
