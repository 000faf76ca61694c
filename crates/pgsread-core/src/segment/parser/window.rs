use std::io::Read;

use crate::model::Window;
use crate::segment::error::SegmentError;
use crate::segment::layout;
use crate::segment::reader::BodyReader;

pub(super) fn parse_windows<R: Read>(
    body: &mut BodyReader<'_, R>,
    declared: u16,
) -> Result<Vec<Window>, SegmentError> {
    let count = usize::from(body.read_u8()?);
    let expected = layout::WINDOW_LEN * count + layout::WINDOW_COUNT_LEN;
    // Size is validated before any record is read.
    if usize::from(declared) != expected {
        return Err(SegmentError::SizeMismatch {
            segment: body.segment(),
            declared,
            computed: expected,
        });
    }

    let mut windows = Vec::with_capacity(count);
    for _ in 0..count {
        windows.push(Window {
            id: body.read_u8()?,
            x: body.read_u16_be()?,
            y: body.read_u16_be()?,
            width: body.read_u16_be()?,
            height: body.read_u16_be()?,
        });
    }
    Ok(windows)
}
