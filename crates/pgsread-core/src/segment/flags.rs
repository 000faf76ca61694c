//! Parse steps for enumerated flag bytes.
//!
//! Each function accepts exactly the legal bit patterns and returns the
//! rejected byte otherwise; callers attach segment and field context.

use super::layout;
use crate::model::CompositionState;

impl CompositionState {
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            layout::COMPOSITION_STATE_NORMAL => Some(CompositionState::Normal),
            layout::COMPOSITION_STATE_ACQUISITION_POINT => Some(CompositionState::AcquisitionPoint),
            layout::COMPOSITION_STATE_EPOCH_START => Some(CompositionState::EpochStart),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            CompositionState::Normal => layout::COMPOSITION_STATE_NORMAL,
            CompositionState::AcquisitionPoint => layout::COMPOSITION_STATE_ACQUISITION_POINT,
            CompositionState::EpochStart => layout::COMPOSITION_STATE_EPOCH_START,
        }
    }
}

/// `0x80` is true, `0x00` false; any other bit is rejected.
pub fn parse_palette_update(value: u8) -> Result<bool, u8> {
    if value & !layout::PALETTE_UPDATE_TRUE != 0 {
        return Err(value);
    }
    Ok(value == layout::PALETTE_UPDATE_TRUE)
}

pub fn palette_update_byte(update: bool) -> u8 {
    if update { layout::PALETTE_UPDATE_TRUE } else { 0 }
}

/// `0x40` forces cropping, `0x00` disables it; any other bit is rejected.
pub fn parse_crop_flag(value: u8) -> Result<bool, u8> {
    if value & !layout::CROPPED_FORCE != 0 {
        return Err(value);
    }
    Ok(value == layout::CROPPED_FORCE)
}

pub fn crop_flag_byte(cropped: bool) -> u8 {
    if cropped { layout::CROPPED_FORCE } else { 0 }
}

/// First/last-in-sequence bits of an object definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceFlags {
    pub first: bool,
    pub last: bool,
}

impl SequenceFlags {
    pub fn from_byte(value: u8) -> Result<Self, u8> {
        if value & !(layout::FIRST_IN_SEQUENCE | layout::LAST_IN_SEQUENCE) != 0 {
            return Err(value);
        }
        Ok(Self {
            first: value & layout::FIRST_IN_SEQUENCE != 0,
            last: value & layout::LAST_IN_SEQUENCE != 0,
        })
    }

    pub fn to_byte(self) -> u8 {
        let mut value = 0;
        if self.first {
            value |= layout::FIRST_IN_SEQUENCE;
        }
        if self.last {
            value |= layout::LAST_IN_SEQUENCE;
        }
        value
    }
}
