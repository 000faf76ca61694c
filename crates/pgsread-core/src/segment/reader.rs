use std::io::{self, ErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt};

use super::error::SegmentError;
use super::layout;
use crate::model::SegmentKind;

/// Big-endian field reads for one segment body.
///
/// A source ending part way through a fixed-size field is reported as
/// `TruncatedBody` for the segment being decoded; other I/O failures pass
/// through as `Io`.
pub struct BodyReader<'a, R: Read> {
    source: &'a mut R,
    segment: SegmentKind,
}

impl<'a, R: Read> BodyReader<'a, R> {
    pub fn new(source: &'a mut R, segment: SegmentKind) -> Self {
        Self { source, segment }
    }

    pub fn segment(&self) -> SegmentKind {
        self.segment
    }

    pub fn read_u8(&mut self) -> Result<u8, SegmentError> {
        self.source.read_u8().map_err(|e| self.field_error(e))
    }

    pub fn read_u16_be(&mut self) -> Result<u16, SegmentError> {
        self.source
            .read_u16::<BigEndian>()
            .map_err(|e| self.field_error(e))
    }

    pub fn read_u24_be(&mut self) -> Result<u32, SegmentError> {
        self.source
            .read_u24::<BigEndian>()
            .map_err(|e| self.field_error(e))
    }

    /// Read exactly `len` payload bytes, see [`read_exact_payload`].
    pub fn read_payload(&mut self, len: usize) -> Result<Vec<u8>, SegmentError> {
        read_exact_payload(self.source, len)
    }

    fn field_error(&self, source: io::Error) -> SegmentError {
        match source.kind() {
            ErrorKind::UnexpectedEof => SegmentError::TruncatedBody {
                segment: self.segment,
                source,
            },
            _ => SegmentError::Io(source),
        }
    }
}

/// Fill `buf` from `source` until it is full or the source is exhausted.
///
/// Returns the number of bytes read. Short reads and `Interrupted` errors are
/// retried; any other I/O error is returned as is.
pub fn fill_buf<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read the fixed segment header.
///
/// # Errors
/// `EndOfStream` when the source yields no byte at all,
/// `MalformedHeader(Truncated)` when it ends part way through, and `Io` for
/// any other source failure.
pub fn read_header_bytes<R: Read>(
    source: &mut R,
) -> Result<[u8; layout::HEADER_LEN], SegmentError> {
    let mut header = [0u8; layout::HEADER_LEN];
    let read = fill_buf(source, &mut header)?;
    match read {
        0 => Err(SegmentError::EndOfStream),
        layout::HEADER_LEN => Ok(header),
        read => Err(SegmentError::MalformedHeader(
            super::error::HeaderFault::Truncated { read },
        )),
    }
}

/// Read exactly `len` bytes, accumulating across short reads.
///
/// The source may return fewer bytes than requested on any call; the loop
/// keeps reading until `len` bytes are collected.
///
/// # Errors
/// `TruncatedPayload` carrying the underlying I/O error (or `UnexpectedEof`)
/// when the source ends or fails first.
pub fn read_exact_payload<R: Read>(source: &mut R, len: usize) -> Result<Vec<u8>, SegmentError> {
    let mut data = vec![0u8; len];
    let mut read = 0;
    while read < len {
        match source.read(&mut data[read..]) {
            Ok(0) => {
                return Err(SegmentError::TruncatedPayload {
                    expected: len,
                    read,
                    source: io::Error::from(ErrorKind::UnexpectedEof),
                });
            }
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(SegmentError::TruncatedPayload {
                    expected: len,
                    read,
                    source: e,
                });
            }
        }
    }
    Ok(data)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// Source yielding `prefix` and then failing every read with `kind`.
    pub(crate) struct FailAfter<'a> {
        pub(crate) prefix: &'a [u8],
        pub(crate) kind: ErrorKind,
    }

    impl Read for FailAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.prefix.is_empty() {
                return Err(self.kind.into());
            }
            let n = buf.len().min(self.prefix.len());
            buf[..n].copy_from_slice(&self.prefix[..n]);
            self.prefix = &self.prefix[n..];
            Ok(n)
        }
    }

    /// Source returning at most one byte per `read`, with an `Interrupted`
    /// error before every byte.
    pub(crate) struct Trickle<R> {
        inner: R,
        interrupt: bool,
    }

    impl<R: Read> Trickle<R> {
        pub(crate) fn new(inner: R) -> Self {
            Self {
                inner,
                interrupt: true,
            }
        }
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            if self.interrupt {
                self.interrupt = false;
                return Err(ErrorKind::Interrupted.into());
            }
            self.interrupt = true;
            self.inner.read(&mut buf[..1])
        }
    }

    #[test]
    fn payload_accumulates_short_reads() {
        let mut source = Trickle::new(Cursor::new(vec![1, 2, 3, 4, 5]));
        let data = read_exact_payload(&mut source, 4).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn payload_zero_length_reads_nothing() {
        let mut source = Cursor::new(vec![9]);
        let data = read_exact_payload(&mut source, 0).unwrap();
        assert!(data.is_empty());
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn payload_truncated_reports_counts() {
        let mut source = Cursor::new(vec![1, 2]);
        let err = read_exact_payload(&mut source, 5).unwrap_err();
        match err {
            SegmentError::TruncatedPayload {
                expected,
                read,
                source,
            } => {
                assert_eq!(expected, 5);
                assert_eq!(read, 2);
                assert_eq!(source.kind(), ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_empty_source_is_end_of_stream() {
        let mut source = Cursor::new(Vec::<u8>::new());
        let err = read_header_bytes(&mut source).unwrap_err();
        assert!(err.is_end_of_stream());
    }

    #[test]
    fn header_partial_is_truncated() {
        let mut source = Cursor::new(vec![0x50, 0x47, 0, 0]);
        let err = read_header_bytes(&mut source).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::MalformedHeader(super::super::error::HeaderFault::Truncated { read: 4 })
        ));
    }

    #[test]
    fn body_reader_maps_eof_to_truncated_body() {
        let mut source = Cursor::new(vec![0x01]);
        let mut reader = BodyReader::new(&mut source, SegmentKind::WindowDefinition);
        let err = reader.read_u16_be().unwrap_err();
        assert!(matches!(
            err,
            SegmentError::TruncatedBody {
                segment: SegmentKind::WindowDefinition,
                ..
            }
        ));
    }

    #[test]
    fn body_reader_passes_other_failures_through_as_io() {
        let mut source = FailAfter {
            prefix: &[0x01],
            kind: ErrorKind::PermissionDenied,
        };
        let mut reader = BodyReader::new(&mut source, SegmentKind::WindowDefinition);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        let err = reader.read_u16_be().unwrap_err();
        match err {
            SegmentError::Io(source) => assert_eq!(source.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_source_failure_is_io() {
        let mut source = FailAfter {
            prefix: &[0x50, 0x47, 0x00],
            kind: ErrorKind::PermissionDenied,
        };
        let err = read_header_bytes(&mut source).unwrap_err();
        match err {
            SegmentError::Io(source) => assert_eq!(source.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn body_reader_reads_big_endian() {
        let mut source = Cursor::new(vec![0x12, 0x34, 0x00, 0x01, 0x02]);
        let mut reader = BodyReader::new(&mut source, SegmentKind::ObjectDefinition);
        assert_eq!(reader.read_u16_be().unwrap(), 0x1234);
        assert_eq!(reader.read_u24_be().unwrap(), 0x000102);
    }
}
