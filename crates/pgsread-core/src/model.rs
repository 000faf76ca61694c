//! Decoded segment types.
//!
//! Every value here owns its data; nothing borrows from the decoder or the
//! byte source.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::segment::layout;

/// One decoded segment: timestamp pair plus typed payload.
///
/// # Examples
/// ```
/// use pgsread_core::{Segment, SegmentData, SegmentKind, Timestamp};
///
/// let segment = Segment {
///     presentation_time: Timestamp::from_ticks(90_000),
///     decoding_time: Timestamp::from_ticks(0),
///     data: SegmentData::End,
/// };
/// assert_eq!(segment.kind(), SegmentKind::End);
/// assert_eq!(segment.presentation_time.as_duration().as_secs(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Presentation timestamp (PTS).
    pub presentation_time: Timestamp,
    /// Decoding timestamp (DTS).
    pub decoding_time: Timestamp,
    #[serde(flatten)]
    pub data: SegmentData,
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        self.data.kind()
    }
}

/// Payload of a segment, one variant per segment kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum SegmentData {
    PresentationComposition(PresentationComposition),
    WindowDefinition(Vec<Window>),
    PaletteDefinition(Palette),
    ObjectDefinition(Object),
    /// End of display set; carries no payload.
    End,
}

impl SegmentData {
    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentData::PresentationComposition(_) => SegmentKind::PresentationComposition,
            SegmentData::WindowDefinition(_) => SegmentKind::WindowDefinition,
            SegmentData::PaletteDefinition(_) => SegmentKind::PaletteDefinition,
            SegmentData::ObjectDefinition(_) => SegmentKind::ObjectDefinition,
            SegmentData::End => SegmentKind::End,
        }
    }
}

/// Segment type as carried by the header tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    PaletteDefinition,
    ObjectDefinition,
    PresentationComposition,
    WindowDefinition,
    End,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 5] = [
        SegmentKind::PresentationComposition,
        SegmentKind::WindowDefinition,
        SegmentKind::PaletteDefinition,
        SegmentKind::ObjectDefinition,
        SegmentKind::End,
    ];

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            layout::TAG_PALETTE_DEFINITION => Some(SegmentKind::PaletteDefinition),
            layout::TAG_OBJECT_DEFINITION => Some(SegmentKind::ObjectDefinition),
            layout::TAG_PRESENTATION_COMPOSITION => Some(SegmentKind::PresentationComposition),
            layout::TAG_WINDOW_DEFINITION => Some(SegmentKind::WindowDefinition),
            layout::TAG_END => Some(SegmentKind::End),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            SegmentKind::PaletteDefinition => layout::TAG_PALETTE_DEFINITION,
            SegmentKind::ObjectDefinition => layout::TAG_OBJECT_DEFINITION,
            SegmentKind::PresentationComposition => layout::TAG_PRESENTATION_COMPOSITION,
            SegmentKind::WindowDefinition => layout::TAG_WINDOW_DEFINITION,
            SegmentKind::End => layout::TAG_END,
        }
    }

    /// Short name used in reports (e.g., "pcs").
    pub fn short_name(self) -> &'static str {
        match self {
            SegmentKind::PaletteDefinition => "pds",
            SegmentKind::ObjectDefinition => "ods",
            SegmentKind::PresentationComposition => "pcs",
            SegmentKind::WindowDefinition => "wds",
            SegmentKind::End => "end",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentKind::PaletteDefinition => "palette definition segment",
            SegmentKind::ObjectDefinition => "object definition segment",
            SegmentKind::PresentationComposition => "presentation composition segment",
            SegmentKind::WindowDefinition => "window definition segment",
            SegmentKind::End => "end segment",
        };
        f.write_str(name)
    }
}

/// A 90 kHz tick count.
///
/// The raw count is kept so segments re-encode bit-exactly; the duration
/// view is derived with integer arithmetic only.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use pgsread_core::Timestamp;
///
/// let ts = Timestamp::from_ticks(45_000);
/// assert_eq!(ts.as_duration(), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Timestamp(u32);

impl Timestamp {
    pub const fn from_ticks(ticks: u32) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        ticks_to_duration(self.0)
    }
}

/// Convert a 90 kHz tick count to a duration, truncating to whole nanoseconds.
pub fn ticks_to_duration(ticks: u32) -> Duration {
    let ticks = u64::from(ticks);
    let secs = ticks / layout::TICKS_PER_SECOND;
    let rem = ticks % layout::TICKS_PER_SECOND;
    // rem < 90_000, so the product stays far below u64::MAX.
    let nanos = rem * 1_000_000_000 / layout::TICKS_PER_SECOND;
    Duration::new(secs, nanos as u32)
}

/// Presentation composition segment (PCS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationComposition {
    pub width: u16,
    pub height: u16,
    /// Frame-rate code, passed through undecoded.
    pub frame_rate: u8,
    pub composition_number: u16,
    pub composition_state: CompositionState,
    pub palette_update: bool,
    pub palette_id: u8,
    pub objects: Vec<CompositionObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionState {
    Normal,
    AcquisitionPoint,
    EpochStart,
}

/// Placement of one object inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionObject {
    pub object_id: u16,
    pub window_id: u8,
    pub x: u16,
    pub y: u16,
    /// Present only when the object is flagged as cropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crop {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub id: u8,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Palette definition segment (PDS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub id: u8,
    pub version: u8,
    /// Entries in stream order; IDs are unique within one segment.
    pub entries: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub id: u8,
    pub luma: u8,
    pub chroma_red: u8,
    pub chroma_blue: u8,
    pub alpha: u8,
}

/// Object definition segment (ODS).
///
/// `data` is the run-length encoded bitmap piece carried by this segment.
/// Pieces of one bitmap are flagged with `first_in_sequence` and
/// `last_in_sequence`; joining them is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Object {
    pub id: u16,
    pub version: u8,
    pub first_in_sequence: bool,
    pub last_in_sequence: bool,
    pub width: u16,
    pub height: u16,
    #[serde(rename = "data_len", serialize_with = "serialize_len")]
    pub data: Vec<u8>,
}

fn serialize_len<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(data.len() as u64)
}
