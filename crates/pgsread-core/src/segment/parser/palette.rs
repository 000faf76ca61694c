use std::collections::HashSet;
use std::io::Read;

use crate::model::{Palette, PaletteEntry};
use crate::segment::error::SegmentError;
use crate::segment::layout;
use crate::segment::reader::BodyReader;

pub(super) fn parse_palette<R: Read>(
    body: &mut BodyReader<'_, R>,
    declared: u16,
) -> Result<Palette, SegmentError> {
    let size = usize::from(declared);
    if size % layout::PALETTE_ENTRY_LEN != layout::PALETTE_HEADER_LEN {
        return Err(SegmentError::InvalidSize {
            segment: body.segment(),
            declared,
        });
    }

    let id = body.read_u8()?;
    let version = body.read_u8()?;
    let count = (size - layout::PALETTE_HEADER_LEN) / layout::PALETTE_ENTRY_LEN;

    let mut entries = Vec::with_capacity(count);
    let mut seen = HashSet::with_capacity(count);
    for index in 0..count {
        let entry = PaletteEntry {
            id: body.read_u8()?,
            luma: body.read_u8()?,
            chroma_red: body.read_u8()?,
            chroma_blue: body.read_u8()?,
            alpha: body.read_u8()?,
        };
        if !seen.insert(entry.id) {
            return Err(SegmentError::DuplicateId {
                id: entry.id,
                index,
                count,
            });
        }
        entries.push(entry);
    }

    Ok(Palette {
        id,
        version,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use crate::model::{SegmentData, SegmentKind};
    use crate::segment::error::SegmentError;
    use crate::segment::parser::SegmentReader;
    use crate::segment::parser::tests::header;

    fn palette_body(ids: &[u8]) -> Vec<u8> {
        let mut body = vec![2, 5];
        for id in ids {
            body.extend_from_slice(&[*id, 235, 128, 128, 255]);
        }
        body
    }

    fn decode(size: u16, body: &[u8]) -> Result<SegmentData, SegmentError> {
        let mut bytes = header(SegmentKind::PaletteDefinition, size);
        bytes.extend_from_slice(body);
        SegmentReader::new(&bytes[..]).read_segment().map(|s| s.data)
    }

    #[test]
    fn one_entry_in_seven_bytes() {
        let SegmentData::PaletteDefinition(palette) = decode(7, &palette_body(&[9])).unwrap()
        else {
            panic!("expected palette");
        };
        assert_eq!(palette.id, 2);
        assert_eq!(palette.version, 5);
        assert_eq!(palette.entries.len(), 1);
        let entry = palette.entries[0];
        assert_eq!(
            (entry.id, entry.luma, entry.chroma_red, entry.chroma_blue, entry.alpha),
            (9, 235, 128, 128, 255)
        );
    }

    #[test]
    fn entry_count_derived_from_size() {
        let ids: Vec<u8> = (0..=255).collect();
        let size = (2 + 5 * ids.len()) as u16;
        let SegmentData::PaletteDefinition(palette) = decode(size, &palette_body(&ids)).unwrap()
        else {
            panic!("expected palette");
        };
        assert_eq!(palette.entries.len(), 256);
        assert_eq!(palette.entries[255].id, 255);
    }

    #[test]
    fn header_only_palette() {
        let SegmentData::PaletteDefinition(palette) = decode(2, &palette_body(&[])).unwrap()
        else {
            panic!("expected palette");
        };
        assert!(palette.entries.is_empty());
    }

    #[test]
    fn size_not_two_mod_five() {
        for size in [0u16, 1, 3, 6, 8, 11] {
            let err = decode(size, &palette_body(&[1, 2])).unwrap_err();
            assert!(
                matches!(err, SegmentError::InvalidSize { declared, .. } if declared == size),
                "size {size}: {err:?}"
            );
        }
    }

    #[test]
    fn duplicate_entry_id() {
        let err = decode(17, &palette_body(&[5, 6, 5])).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::DuplicateId {
                id: 5,
                index: 2,
                count: 3
            }
        ));
    }

    #[test]
    fn truncated_entries() {
        let mut body = palette_body(&[1, 2]);
        body.truncate(9);
        let err = decode(12, &body).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::TruncatedBody {
                segment: SegmentKind::PaletteDefinition,
                ..
            }
        ));
    }
}
