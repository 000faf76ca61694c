mod sup;

pub use sup::SupFileSource;

use std::io::Read;

use thiserror::Error;

use crate::model::Segment;
use crate::segment::{SegmentError, SegmentReader};

/// A sequential supplier of decoded segments.
///
/// `Ok(None)` marks a clean end of stream at a segment boundary.
pub trait SegmentSource {
    fn next_segment(&mut self) -> Result<Option<Segment>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("segment decode error: {0}")]
    Decode(#[from] SegmentError),
}

impl<R: Read> SegmentSource for SegmentReader<R> {
    fn next_segment(&mut self) -> Result<Option<Segment>, SourceError> {
        match self.read_segment() {
            Ok(segment) => Ok(Some(segment)),
            Err(SegmentError::EndOfStream) => Ok(None),
            Err(err) => Err(SourceError::Decode(err)),
        }
    }
}
