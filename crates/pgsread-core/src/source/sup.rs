use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{SegmentSource, SourceError};
use crate::model::Segment;
use crate::segment::SegmentReader;

/// Segment source backed by a `.sup` file (a bare concatenated PGS stream).
pub struct SupFileSource {
    reader: SegmentReader<BufReader<File>>,
    bytes: u64,
}

impl SupFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let bytes = file.metadata()?.len();
        Ok(Self {
            reader: SegmentReader::new(BufReader::new(file)),
            bytes,
        })
    }

    /// File size in bytes at open time.
    pub fn len(&self) -> u64 {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

impl SegmentSource for SupFileSource {
    fn next_segment(&mut self) -> Result<Option<Segment>, SourceError> {
        self.reader.next_segment()
    }
}
