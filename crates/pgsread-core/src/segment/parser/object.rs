use std::io::Read;

use log::debug;

use crate::model::Object;
use crate::segment::error::{FlagField, SegmentError};
use crate::segment::flags::SequenceFlags;
use crate::segment::layout;
use crate::segment::reader::BodyReader;

pub(super) fn parse_object<R: Read>(
    body: &mut BodyReader<'_, R>,
    declared: u16,
) -> Result<Object, SegmentError> {
    let segment = body.segment();
    let id = body.read_u16_be()?;
    let version = body.read_u8()?;
    let flags = SequenceFlags::from_byte(body.read_u8()?).map_err(|value| {
        SegmentError::UnrecognizedValue {
            segment,
            field: FlagField::SequenceFlags,
            value,
        }
    })?;
    let data_length = body.read_u24_be()?;
    let width = body.read_u16_be()?;
    let height = body.read_u16_be()?;

    let payload_len = (data_length as usize)
        .checked_sub(layout::OBJECT_DIMENSIONS_LEN)
        .ok_or(SegmentError::InvalidLength {
            segment,
            data_length,
        })?;

    let body_len = layout::OBJECT_HEADER_LEN + payload_len;
    if body_len != usize::from(declared) {
        debug!(
            "object {id} v{version}: data length {data_length} spans {body_len} bytes, {declared} declared in header"
        );
    }

    let data = body.read_payload(payload_len)?;

    Ok(Object {
        id,
        version,
        first_in_sequence: flags.first,
        last_in_sequence: flags.last,
        width,
        height,
        data,
    })
}
