use std::fmt;
use std::io;

use thiserror::Error;

use crate::model::SegmentKind;

/// Errors returned by segment decoding.
///
/// `EndOfStream` is the normal termination signal at a segment boundary;
/// every other variant is the first structural violation found in the
/// stream, after which the source position is undefined.
///
/// # Examples
/// ```
/// use pgsread_core::{SegmentError, SegmentKind};
///
/// let err = SegmentError::InvalidSize {
///     segment: SegmentKind::PaletteDefinition,
///     declared: 6,
/// };
/// assert!(err.to_string().starts_with("palette definition segment"));
/// assert!(!err.is_end_of_stream());
/// ```
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("end of segment stream")]
    EndOfStream,
    #[error("segment header: {0}")]
    MalformedHeader(HeaderFault),
    #[error("{segment}: unrecognized {field}: 0x{value:02x}")]
    UnrecognizedValue {
        segment: SegmentKind,
        field: FlagField,
        value: u8,
    },
    #[error("{segment}: read {computed} bytes, {declared} bytes declared in header")]
    SizeMismatch {
        segment: SegmentKind,
        declared: u16,
        computed: usize,
    },
    #[error("{segment}: invalid segment size of {declared} bytes in header")]
    InvalidSize { segment: SegmentKind, declared: u16 },
    #[error("{segment}: data length {data_length} excludes width and height")]
    InvalidLength {
        segment: SegmentKind,
        data_length: u32,
    },
    #[error("palette definition segment: palette entry {index}/{count}: ID {id} reused")]
    DuplicateId { id: u8, index: usize, count: usize },
    #[error("object definition segment: payload truncated after {read} of {expected} bytes")]
    TruncatedPayload {
        expected: usize,
        read: usize,
        #[source]
        source: io::Error,
    },
    #[error("{segment}: body truncated")]
    TruncatedBody {
        segment: SegmentKind,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SegmentError {
    /// True for the clean end-of-stream signal.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, SegmentError::EndOfStream)
    }
}

/// Reason a segment header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderFault {
    #[error("truncated after {read} of 13 bytes")]
    Truncated { read: usize },
    #[error("magic number not \"PG\" 0x5047: 0x{found:04x}")]
    BadMagic { found: u16 },
    #[error("unrecognized segment type: 0x{tag:02x}")]
    UnknownType { tag: u8 },
}

/// Enumerated field whose byte held an illegal bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagField {
    CompositionState,
    PaletteUpdate,
    /// Crop flag of composition object `object` (1-based) out of `count`.
    CropFlag { object: usize, count: usize },
    SequenceFlags,
}

impl fmt::Display for FlagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagField::CompositionState => write!(f, "composition state"),
            FlagField::PaletteUpdate => write!(f, "palette update flag"),
            FlagField::CropFlag { object, count } => {
                write!(f, "cropped flag of composition object {object}/{count}")
            }
            FlagField::SequenceFlags => write!(f, "sequence flag"),
        }
    }
}

/// Errors returned by segment encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{segment}: {field} of {value} exceeds the wire maximum of {max}")]
    TooLarge {
        segment: SegmentKind,
        field: &'static str,
        value: usize,
        max: usize,
    },
}
