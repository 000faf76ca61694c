use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::model::{CompositionState, Segment, SegmentData, SegmentKind};
use crate::source::{SegmentSource, SourceError, SupFileSource};
use crate::{KindCount, Report, StreamSummary, make_stub_report};

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("segment {index}: {source}")]
    Decode {
        /// Zero-based index of the failing segment.
        index: u64,
        #[source]
        source: SourceError,
    },
}

impl InspectError {
    /// Number of segments decoded successfully before the failure.
    pub fn decoded(&self) -> u64 {
        match self {
            InspectError::Source(_) => 0,
            InspectError::Decode { index, .. } => *index,
        }
    }
}

pub fn inspect_sup_file(path: &Path) -> Result<Report, InspectError> {
    let source = SupFileSource::open(path)?;
    let bytes = source.len();
    inspect_source(path, bytes, source)
}

/// Decode every segment of `source` into a report.
///
/// # Errors
/// `Decode` with the index of the first segment that failed to decode.
pub fn inspect_source<S: SegmentSource>(
    path: &Path,
    bytes: u64,
    source: S,
) -> Result<Report, InspectError> {
    let mut report = make_stub_report(&path.to_string_lossy(), bytes);
    walk(source, &mut report.summary, |segment| report.segments.push(segment))?;
    debug!(
        "inspected {}: {} segments, {} display sets",
        path.display(),
        report.summary.segments_total,
        report.summary.display_sets
    );
    Ok(report)
}

/// Decode a whole `.sup` file, keeping only the stream counters.
pub fn summarize_sup_file(path: &Path) -> Result<StreamSummary, InspectError> {
    summarize_source(SupFileSource::open(path)?)
}

/// Like [`inspect_source`], but each segment is dropped once counted.
pub fn summarize_source<S: SegmentSource>(source: S) -> Result<StreamSummary, InspectError> {
    let mut summary = StreamSummary::default();
    walk(source, &mut summary, drop)?;
    Ok(summary)
}

fn walk<S, F>(mut source: S, summary: &mut StreamSummary, mut keep: F) -> Result<(), InspectError>
where
    S: SegmentSource,
    F: FnMut(Segment),
{
    let mut kinds: BTreeMap<SegmentKind, u64> = BTreeMap::new();
    loop {
        let index = summary.segments_total;
        let segment = match source.next_segment() {
            Ok(Some(segment)) => segment,
            Ok(None) => break,
            Err(err) => return Err(InspectError::Decode { index, source: err }),
        };
        *kinds.entry(segment.kind()).or_default() += 1;
        update_summary(summary, &segment);
        keep(segment);
    }
    summary.kinds = build_kind_counts(&kinds);
    Ok(())
}

fn update_summary(summary: &mut StreamSummary, segment: &Segment) {
    summary.segments_total += 1;
    let pts = segment.presentation_time.ticks();
    summary.pts_start.get_or_insert(pts);
    summary.pts_end = Some(pts);

    match &segment.data {
        SegmentData::PresentationComposition(pc) => {
            if pc.composition_state == CompositionState::EpochStart {
                summary.epochs += 1;
            }
        }
        SegmentData::ObjectDefinition(object) => {
            summary.object_data_bytes += object.data.len() as u64;
        }
        SegmentData::End => summary.display_sets += 1,
        SegmentData::WindowDefinition(_) | SegmentData::PaletteDefinition(_) => {}
    }
}

/// Counts in a stable order: composition, window, palette, object, end.
fn build_kind_counts(kinds: &BTreeMap<SegmentKind, u64>) -> Vec<KindCount> {
    SegmentKind::ALL
        .iter()
        .filter_map(|kind| {
            kinds.get(kind).map(|count| KindCount {
                kind: kind.short_name().to_string(),
                count: *count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Object, PresentationComposition, Timestamp};
    use crate::segment::SegmentReader;

    fn segment(pts: u32, data: SegmentData) -> Segment {
        Segment {
            presentation_time: Timestamp::from_ticks(pts),
            decoding_time: Timestamp::from_ticks(pts),
            data,
        }
    }

    fn composition(state: CompositionState) -> SegmentData {
        SegmentData::PresentationComposition(PresentationComposition {
            width: 720,
            height: 480,
            frame_rate: 0x10,
            composition_number: 0,
            composition_state: state,
            palette_update: false,
            palette_id: 0,
            objects: Vec::new(),
        })
    }

    fn encode(segments: &[Segment]) -> Vec<u8> {
        segments
            .iter()
            .flat_map(|s| s.to_bytes().expect("encode"))
            .collect()
    }

    #[test]
    fn summary_counts_display_sets_and_epochs() {
        let bytes = encode(&[
            segment(100, composition(CompositionState::EpochStart)),
            segment(
                100,
                SegmentData::ObjectDefinition(Object {
                    id: 0,
                    version: 0,
                    first_in_sequence: true,
                    last_in_sequence: true,
                    width: 1,
                    height: 1,
                    data: vec![0; 10],
                }),
            ),
            segment(100, SegmentData::End),
            segment(900, composition(CompositionState::Normal)),
            segment(900, SegmentData::End),
        ]);
        let report =
            inspect_source(Path::new("a.sup"), bytes.len() as u64, SegmentReader::new(&bytes[..]))
                .unwrap();

        let summary = &report.summary;
        assert_eq!(summary.segments_total, 5);
        assert_eq!(summary.display_sets, 2);
        assert_eq!(summary.epochs, 1);
        assert_eq!(summary.object_data_bytes, 10);
        assert_eq!(summary.pts_start, Some(100));
        assert_eq!(summary.pts_end, Some(900));
        assert_eq!(
            summary.kinds,
            vec![
                KindCount {
                    kind: "pcs".to_string(),
                    count: 2
                },
                KindCount {
                    kind: "ods".to_string(),
                    count: 1
                },
                KindCount {
                    kind: "end".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn summary_only_walk_matches_report() {
        let bytes = encode(&[
            segment(100, composition(CompositionState::EpochStart)),
            segment(100, SegmentData::End),
            segment(500, composition(CompositionState::AcquisitionPoint)),
            segment(500, SegmentData::End),
        ]);
        let summary = summarize_source(SegmentReader::new(&bytes[..])).unwrap();
        let report =
            inspect_source(Path::new("c.sup"), bytes.len() as u64, SegmentReader::new(&bytes[..]))
                .unwrap();
        assert_eq!(summary.segments_total, 4);
        assert_eq!(summary.display_sets, 2);
        assert_eq!(summary.pts_end, Some(500));
        assert_eq!(summary.kinds, report.summary.kinds);
    }

    #[test]
    fn summary_only_walk_reports_failing_index() {
        let mut bytes = encode(&[segment(0, SegmentData::End), segment(0, SegmentData::End)]);
        bytes.push(0x50);
        let err = summarize_source(SegmentReader::new(&bytes[..])).unwrap_err();
        assert_eq!(err.decoded(), 2);
    }

    #[test]
    fn decode_error_reports_index() {
        let mut bytes = encode(&[segment(0, SegmentData::End)]);
        bytes.extend_from_slice(&[0x00, 0x00]);
        let err = inspect_source(Path::new("b.sup"), 0, SegmentReader::new(&bytes[..]))
            .unwrap_err();
        assert_eq!(err.decoded(), 1);
        assert!(err.to_string().starts_with("segment 1:"));
    }
}
