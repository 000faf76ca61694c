use std::fs;
use std::path::{Path, PathBuf};

use pgsread_core::segment::layout;
use pgsread_core::{
    CompositionObject, CompositionState, Object, Palette, PaletteEntry, PresentationComposition,
    Segment, SegmentData, Timestamp, Window,
};

const WIDTH: u16 = 1920;
const HEIGHT: u16 = 1080;
const FRAME_RATE: u8 = 0x10;
const RLE_LINE: [u8; 8] = [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
const TRUNCATED_TAIL: usize = 3;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests").join("fixtures");
    fs::create_dir_all(&root)
        .map_err(|err| format!("failed to create {}: {}", root.display(), err))?;

    let stream = encode(&two_display_sets())?;
    write_fixture(&root.join("two_display_sets.sup"), &stream)?;

    let first_set = encode(&first_display_set())?;
    let object_end = first_set.len() - layout::HEADER_LEN;
    write_fixture(
        &root.join("truncated_object.sup"),
        &first_set[..object_end - TRUNCATED_TAIL],
    )?;
    Ok(())
}

fn write_fixture(path: &Path, bytes: &[u8]) -> Result<(), String> {
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

fn encode(segments: &[Segment]) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    for segment in segments {
        pgsread_core::write_segment(&mut bytes, segment)
            .map_err(|err| format!("encode failed: {}", err))?;
    }
    Ok(bytes)
}

fn segment(pts: u32, dts: u32, data: SegmentData) -> Segment {
    Segment {
        presentation_time: Timestamp::from_ticks(pts),
        decoding_time: Timestamp::from_ticks(dts),
        data,
    }
}

fn window() -> Window {
    Window {
        id: 0,
        x: 760,
        y: 960,
        width: 400,
        height: 60,
    }
}

fn first_display_set() -> Vec<Segment> {
    let (pts, dts) = (90_000, 86_400);
    vec![
        segment(
            pts,
            dts,
            SegmentData::PresentationComposition(PresentationComposition {
                width: WIDTH,
                height: HEIGHT,
                frame_rate: FRAME_RATE,
                composition_number: 0,
                composition_state: CompositionState::EpochStart,
                palette_update: false,
                palette_id: 0,
                objects: vec![CompositionObject {
                    object_id: 0,
                    window_id: 0,
                    x: 760,
                    y: 960,
                    crop: None,
                }],
            }),
        ),
        segment(pts, dts, SegmentData::WindowDefinition(vec![window()])),
        segment(
            pts,
            dts,
            SegmentData::PaletteDefinition(Palette {
                id: 0,
                version: 0,
                entries: vec![
                    PaletteEntry {
                        id: 0,
                        luma: 16,
                        chroma_red: 128,
                        chroma_blue: 128,
                        alpha: 0,
                    },
                    PaletteEntry {
                        id: 1,
                        luma: 235,
                        chroma_red: 128,
                        chroma_blue: 128,
                        alpha: 255,
                    },
                ],
            }),
        ),
        segment(
            pts,
            dts,
            SegmentData::ObjectDefinition(Object {
                id: 0,
                version: 0,
                first_in_sequence: true,
                last_in_sequence: true,
                width: 400,
                height: 60,
                data: RLE_LINE.to_vec(),
            }),
        ),
        segment(pts, dts, SegmentData::End),
    ]
}

fn two_display_sets() -> Vec<Segment> {
    let mut segments = first_display_set();
    let pts = 270_000;
    segments.push(segment(
        pts,
        pts,
        SegmentData::PresentationComposition(PresentationComposition {
            width: WIDTH,
            height: HEIGHT,
            frame_rate: FRAME_RATE,
            composition_number: 1,
            composition_state: CompositionState::Normal,
            palette_update: false,
            palette_id: 0,
            objects: Vec::new(),
        }),
    ));
    segments.push(segment(pts, pts, SegmentData::WindowDefinition(vec![window()])));
    segments.push(segment(pts, pts, SegmentData::End));
    segments
}
