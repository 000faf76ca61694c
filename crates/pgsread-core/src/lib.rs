//! pgsread core library for decoding presentation graphics (PGS) streams.
//!
//! The heart of the crate is the segment decoder: `SegmentReader` pulls one
//! self-describing segment at a time from any `std::io::Read`, validates its
//! header, dispatches on the type tag and parses the body
//! (layout/reader/flags/parser). Decoding is sequential and stateless between
//! calls; the first structural violation is returned as a `SegmentError`.
//!
//! Around the decoder sit an encoder (`write_segment`), a file-backed
//! `SegmentSource`, and `inspect_sup_file`, which walks a whole stream into a
//! serializable `Report` for the CLI.
//!
//! Invariants:
//! - Every decoded `Segment` owns its data.
//! - `EndOfStream` is only returned at a segment boundary.
//! - Object pieces are never joined; first/last flags are surfaced as is.
//!
//! # Examples
//! ```
//! use pgsread_core::{SegmentData, SegmentReader};
//!
//! let stream = [0x50, 0x47, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0, 0];
//! let segments: Vec<_> = SegmentReader::new(&stream[..]).collect::<Result<_, _>>()?;
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].data, SegmentData::End);
//! # Ok::<(), pgsread_core::SegmentError>(())
//! ```

use serde::{Deserialize, Serialize};

mod inspect;
mod model;
pub mod segment;
mod source;

pub use inspect::{
    InspectError, inspect_source, inspect_sup_file, summarize_source, summarize_sup_file,
};
pub use model::{
    CompositionObject, CompositionState, Crop, Object, Palette, PaletteEntry,
    PresentationComposition, Segment, SegmentData, SegmentKind, Timestamp, Window,
    ticks_to_duration,
};
pub use segment::{
    EncodeError, FlagField, HeaderFault, SegmentError, SegmentReader, decode_all, write_segment,
};
pub use source::{SegmentSource, SourceError, SupFileSource};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Result of walking a segment stream, with segments in stream order.
///
/// # Examples
/// ```
/// use pgsread_core::make_stub_report;
///
/// let report = make_stub_report("subtitles.sup", 123);
/// assert_eq!(report.report_version, pgsread_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input stream metadata.
    pub input: InputInfo,
    /// Counts and time bounds over the whole stream.
    pub summary: StreamSummary,
    /// Decoded segments in stream order.
    pub segments: Vec<Segment>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input stream metadata embedded in reports.
///
/// # Examples
/// ```
/// use pgsread_core::InputInfo;
///
/// let input = InputInfo {
///     path: "subtitles.sup".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Stream-wide counters.
///
/// Display sets are counted by end segments and epochs by epoch-start
/// compositions; no segment content is merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamSummary {
    pub segments_total: u64,
    /// Per-kind counts keyed by short name ("pcs", "wds", "pds", "ods", "end").
    pub kinds: Vec<KindCount>,
    pub display_sets: u64,
    pub epochs: u64,
    /// Total bytes of object payload across all object segments.
    pub object_data_bytes: u64,
    /// First presentation timestamp in 90 kHz ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pts_start: Option<u32>,
    /// Last presentation timestamp in 90 kHz ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pts_end: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindCount {
    pub kind: String,
    pub count: u64,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use pgsread_core::make_stub_report;
///
/// let report = make_stub_report("subtitles.sup", 123);
/// assert!(report.segments.is_empty());
/// assert_eq!(report.summary.segments_total, 0);
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "pgsread".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: StreamSummary::default(),
        segments: vec![],
    }
}
