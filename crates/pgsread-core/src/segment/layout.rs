pub const MAGIC: u16 = 0x5047;
pub const HEADER_LEN: usize = 13;

pub const MAGIC_RANGE: std::ops::Range<usize> = 0..2;
pub const PTS_RANGE: std::ops::Range<usize> = 2..6;
pub const DTS_RANGE: std::ops::Range<usize> = 6..10;
pub const TYPE_OFFSET: usize = 10;
pub const SIZE_RANGE: std::ops::Range<usize> = 11..13;

pub const TAG_PALETTE_DEFINITION: u8 = 0x14;
pub const TAG_OBJECT_DEFINITION: u8 = 0x15;
pub const TAG_PRESENTATION_COMPOSITION: u8 = 0x16;
pub const TAG_WINDOW_DEFINITION: u8 = 0x17;
pub const TAG_END: u8 = 0x80;

pub const COMPOSITION_HEADER_LEN: usize = 11;
pub const COMPOSITION_OBJECT_LEN: usize = 8;
pub const CROP_LEN: usize = 8;

pub const COMPOSITION_STATE_NORMAL: u8 = 0x00;
pub const COMPOSITION_STATE_ACQUISITION_POINT: u8 = 0x40;
pub const COMPOSITION_STATE_EPOCH_START: u8 = 0x80;
pub const PALETTE_UPDATE_TRUE: u8 = 0x80;
pub const CROPPED_FORCE: u8 = 0x40;

pub const WINDOW_COUNT_LEN: usize = 1;
pub const WINDOW_LEN: usize = 9;

pub const PALETTE_HEADER_LEN: usize = 2;
pub const PALETTE_ENTRY_LEN: usize = 5;

/// Object ID, version, sequence flags, data length, width, height.
pub const OBJECT_HEADER_LEN: usize = 11;
/// Width and height are counted in the declared object data length.
pub const OBJECT_DIMENSIONS_LEN: usize = 4;
pub const FIRST_IN_SEQUENCE: u8 = 0x80;
pub const LAST_IN_SEQUENCE: u8 = 0x40;
pub const OBJECT_DATA_LENGTH_MAX: u32 = 0x00ff_ffff;

/// 90 kHz presentation clock.
pub const TICKS_PER_SECOND: u64 = 90_000;
