use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use super::error::{HeaderFault, SegmentError};
use super::layout;
use super::reader::{BodyReader, read_header_bytes};
use crate::model::{Segment, SegmentData, SegmentKind, Timestamp};

mod composition;
mod object;
mod palette;
mod window;

/// Fixed-layout fields shared by every segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    pub presentation_time: Timestamp,
    pub decoding_time: Timestamp,
    pub kind: SegmentKind,
    /// Body size in bytes, as declared.
    pub size: u16,
}

/// Validate and decode the 13 header bytes.
///
/// # Errors
/// `MalformedHeader` on a magic mismatch or an unknown type tag.
pub fn parse_header(bytes: &[u8; layout::HEADER_LEN]) -> Result<SegmentHeader, SegmentError> {
    let magic = BigEndian::read_u16(&bytes[layout::MAGIC_RANGE]);
    if magic != layout::MAGIC {
        return Err(SegmentError::MalformedHeader(HeaderFault::BadMagic {
            found: magic,
        }));
    }
    let tag = bytes[layout::TYPE_OFFSET];
    let kind = SegmentKind::from_tag(tag)
        .ok_or(SegmentError::MalformedHeader(HeaderFault::UnknownType { tag }))?;

    Ok(SegmentHeader {
        presentation_time: Timestamp::from_ticks(BigEndian::read_u32(&bytes[layout::PTS_RANGE])),
        decoding_time: Timestamp::from_ticks(BigEndian::read_u32(&bytes[layout::DTS_RANGE])),
        kind,
        size: BigEndian::read_u16(&bytes[layout::SIZE_RANGE]),
    })
}

/// Decodes segments one at a time from a sequential byte source.
///
/// The reader keeps no state between calls besides the source itself. After
/// any error other than `EndOfStream` the source position is undefined and
/// decoding must not continue.
///
/// # Examples
/// ```
/// use pgsread_core::{SegmentData, SegmentReader};
///
/// let bytes = [0x50, 0x47, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0, 0];
/// let mut reader = SegmentReader::new(&bytes[..]);
/// let segment = reader.read_segment()?;
/// assert_eq!(segment.data, SegmentData::End);
/// assert!(reader.read_segment().unwrap_err().is_end_of_stream());
/// # Ok::<(), pgsread_core::SegmentError>(())
/// ```
pub struct SegmentReader<R: Read> {
    source: R,
    finished: bool,
}

impl<R: Read> SegmentReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            finished: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Decode the next segment.
    ///
    /// # Errors
    /// `EndOfStream` when the source is exhausted at a segment boundary;
    /// otherwise the first structural violation of the segment.
    pub fn read_segment(&mut self) -> Result<Segment, SegmentError> {
        let bytes = read_header_bytes(&mut self.source)?;
        trace!("segment header bytes: {:02x?}", bytes);
        let header = parse_header(&bytes)?;
        let data = read_body(&mut self.source, &header)?;
        debug!(
            "decoded {} pts={} dts={} size={}",
            header.kind,
            header.presentation_time.ticks(),
            header.decoding_time.ticks(),
            header.size
        );
        Ok(Segment {
            presentation_time: header.presentation_time,
            decoding_time: header.decoding_time,
            data,
        })
    }
}

impl<R: Read> Iterator for SegmentReader<R> {
    type Item = Result<Segment, SegmentError>;

    /// Yields segments until the end of stream or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_segment() {
            Ok(segment) => Some(Ok(segment)),
            Err(SegmentError::EndOfStream) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for SegmentReader<R> {}

fn read_body<R: Read>(source: &mut R, header: &SegmentHeader) -> Result<SegmentData, SegmentError> {
    let mut body = BodyReader::new(source, header.kind);
    let data = match header.kind {
        SegmentKind::PresentationComposition => SegmentData::PresentationComposition(
            composition::parse_presentation_composition(&mut body, header.size)?,
        ),
        SegmentKind::WindowDefinition => {
            SegmentData::WindowDefinition(window::parse_windows(&mut body, header.size)?)
        }
        SegmentKind::PaletteDefinition => {
            SegmentData::PaletteDefinition(palette::parse_palette(&mut body, header.size)?)
        }
        SegmentKind::ObjectDefinition => {
            SegmentData::ObjectDefinition(object::parse_object(&mut body, header.size)?)
        }
        SegmentKind::End => SegmentData::End,
    };
    Ok(data)
}

/// Decode a complete in-memory segment stream.
///
/// # Errors
/// The first decode error; a clean end of input is not an error.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Segment>, SegmentError> {
    SegmentReader::new(bytes).collect()
}
