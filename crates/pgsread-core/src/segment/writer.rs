use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use super::error::EncodeError;
use super::flags::{SequenceFlags, crop_flag_byte, palette_update_byte};
use super::layout;
use crate::model::{
    Object, Palette, PresentationComposition, Segment, SegmentData, SegmentKind, Window,
};

/// Encode one segment, header included.
///
/// The body is assembled first so the header carries its exact size. Any
/// segment produced by the parser re-encodes to the bytes it was decoded
/// from.
///
/// # Errors
/// `TooLarge` when a count or length does not fit its wire field, `Io` when
/// the writer fails.
pub fn write_segment<W: Write>(writer: &mut W, segment: &Segment) -> Result<(), EncodeError> {
    let kind = segment.kind();
    let body = encode_body(&segment.data)?;
    let size = fit(kind, "body size", body.len(), usize::from(u16::MAX))?;

    writer.write_u16::<BigEndian>(layout::MAGIC)?;
    writer.write_u32::<BigEndian>(segment.presentation_time.ticks())?;
    writer.write_u32::<BigEndian>(segment.decoding_time.ticks())?;
    writer.write_u8(kind.tag())?;
    writer.write_u16::<BigEndian>(size as u16)?;
    writer.write_all(&body)?;
    Ok(())
}

impl Segment {
    /// Encode this segment into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::new();
        write_segment(&mut bytes, self)?;
        Ok(bytes)
    }
}

fn encode_body(data: &SegmentData) -> Result<Vec<u8>, EncodeError> {
    let mut body = Vec::new();
    match data {
        SegmentData::PresentationComposition(pc) => write_composition(&mut body, pc)?,
        SegmentData::WindowDefinition(windows) => write_windows(&mut body, windows)?,
        SegmentData::PaletteDefinition(palette) => write_palette(&mut body, palette)?,
        SegmentData::ObjectDefinition(object) => write_object(&mut body, object)?,
        SegmentData::End => {}
    }
    Ok(body)
}

fn write_composition(body: &mut Vec<u8>, pc: &PresentationComposition) -> Result<(), EncodeError> {
    let count = fit(
        SegmentKind::PresentationComposition,
        "object count",
        pc.objects.len(),
        usize::from(u8::MAX),
    )?;
    body.write_u16::<BigEndian>(pc.width)?;
    body.write_u16::<BigEndian>(pc.height)?;
    body.write_u8(pc.frame_rate)?;
    body.write_u16::<BigEndian>(pc.composition_number)?;
    body.write_u8(pc.composition_state.to_byte())?;
    body.write_u8(palette_update_byte(pc.palette_update))?;
    body.write_u8(pc.palette_id)?;
    body.write_u8(count as u8)?;
    for object in &pc.objects {
        body.write_u16::<BigEndian>(object.object_id)?;
        body.write_u8(object.window_id)?;
        body.write_u8(crop_flag_byte(object.crop.is_some()))?;
        body.write_u16::<BigEndian>(object.x)?;
        body.write_u16::<BigEndian>(object.y)?;
        if let Some(crop) = object.crop {
            body.write_u16::<BigEndian>(crop.x)?;
            body.write_u16::<BigEndian>(crop.y)?;
            body.write_u16::<BigEndian>(crop.width)?;
            body.write_u16::<BigEndian>(crop.height)?;
        }
    }
    Ok(())
}

fn write_windows(body: &mut Vec<u8>, windows: &[Window]) -> Result<(), EncodeError> {
    let count = fit(
        SegmentKind::WindowDefinition,
        "window count",
        windows.len(),
        usize::from(u8::MAX),
    )?;
    body.write_u8(count as u8)?;
    for window in windows {
        body.write_u8(window.id)?;
        body.write_u16::<BigEndian>(window.x)?;
        body.write_u16::<BigEndian>(window.y)?;
        body.write_u16::<BigEndian>(window.width)?;
        body.write_u16::<BigEndian>(window.height)?;
    }
    Ok(())
}

fn write_palette(body: &mut Vec<u8>, palette: &Palette) -> Result<(), EncodeError> {
    body.write_u8(palette.id)?;
    body.write_u8(palette.version)?;
    for entry in &palette.entries {
        body.write_all(&[
            entry.id,
            entry.luma,
            entry.chroma_red,
            entry.chroma_blue,
            entry.alpha,
        ])?;
    }
    Ok(())
}

fn write_object(body: &mut Vec<u8>, object: &Object) -> Result<(), EncodeError> {
    let data_length = fit(
        SegmentKind::ObjectDefinition,
        "object data length",
        object.data.len() + layout::OBJECT_DIMENSIONS_LEN,
        layout::OBJECT_DATA_LENGTH_MAX as usize,
    )?;
    let flags = SequenceFlags {
        first: object.first_in_sequence,
        last: object.last_in_sequence,
    };
    body.write_u16::<BigEndian>(object.id)?;
    body.write_u8(object.version)?;
    body.write_u8(flags.to_byte())?;
    body.write_u24::<BigEndian>(data_length as u32)?;
    body.write_u16::<BigEndian>(object.width)?;
    body.write_u16::<BigEndian>(object.height)?;
    body.write_all(&object.data)?;
    Ok(())
}

fn fit(
    segment: SegmentKind,
    field: &'static str,
    value: usize,
    max: usize,
) -> Result<usize, EncodeError> {
    if value > max {
        return Err(EncodeError::TooLarge {
            segment,
            field,
            value,
            max,
        });
    }
    Ok(value)
}
