//! PGS segment decoding and encoding.
//!
//! The parser reads the 13-byte header, dispatches on the type tag and runs
//! the body parser for that kind. Body parsers validate flag bytes and check
//! declared sizes against the bytes their fields require, returning the
//! first violation found.
//!
//! Wire-format constants live in `layout`, big-endian field access and the
//! read-exactly-N primitive in `reader`, flag-byte parse steps in `flags`.
//! `writer` produces the exact bytes the parser accepts.

pub mod error;
pub mod flags;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::{EncodeError, FlagField, HeaderFault, SegmentError};
pub use parser::{SegmentHeader, SegmentReader, decode_all};
pub use writer::write_segment;
