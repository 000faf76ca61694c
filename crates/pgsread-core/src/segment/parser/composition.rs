use std::io::Read;

use crate::model::{CompositionObject, CompositionState, Crop, PresentationComposition};
use crate::segment::error::{FlagField, SegmentError};
use crate::segment::flags::{parse_crop_flag, parse_palette_update};
use crate::segment::layout;
use crate::segment::reader::BodyReader;

pub(super) fn parse_presentation_composition<R: Read>(
    body: &mut BodyReader<'_, R>,
    declared: u16,
) -> Result<PresentationComposition, SegmentError> {
    let segment = body.segment();
    let width = body.read_u16_be()?;
    let height = body.read_u16_be()?;
    let frame_rate = body.read_u8()?;
    let composition_number = body.read_u16_be()?;

    let state = body.read_u8()?;
    let composition_state =
        CompositionState::from_byte(state).ok_or(SegmentError::UnrecognizedValue {
            segment,
            field: FlagField::CompositionState,
            value: state,
        })?;
    let palette_update =
        parse_palette_update(body.read_u8()?).map_err(|value| SegmentError::UnrecognizedValue {
            segment,
            field: FlagField::PaletteUpdate,
            value,
        })?;
    let palette_id = body.read_u8()?;
    let count = usize::from(body.read_u8()?);

    let mut size = layout::COMPOSITION_HEADER_LEN;
    let mut objects = Vec::with_capacity(count);
    for i in 0..count {
        let object_id = body.read_u16_be()?;
        let window_id = body.read_u8()?;
        let cropped = parse_crop_flag(body.read_u8()?).map_err(|value| {
            SegmentError::UnrecognizedValue {
                segment,
                field: FlagField::CropFlag {
                    object: i + 1,
                    count,
                },
                value,
            }
        })?;
        let x = body.read_u16_be()?;
        let y = body.read_u16_be()?;
        size += layout::COMPOSITION_OBJECT_LEN;

        let crop = if cropped {
            size += layout::CROP_LEN;
            Some(Crop {
                x: body.read_u16_be()?,
                y: body.read_u16_be()?,
                width: body.read_u16_be()?,
                height: body.read_u16_be()?,
            })
        } else {
            None
        };

        objects.push(CompositionObject {
            object_id,
            window_id,
            x,
            y,
            crop,
        });
    }

    if size != usize::from(declared) {
        return Err(SegmentError::SizeMismatch {
            segment,
            declared,
            computed: size,
        });
    }

    Ok(PresentationComposition {
        width,
        height,
        frame_rate,
        composition_number,
        composition_state,
        palette_update,
        palette_id,
        objects,
    })
}
