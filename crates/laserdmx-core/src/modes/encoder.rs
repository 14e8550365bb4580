use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EncodeError;
use super::layout::{self, Binding};
use super::table::{ModeRange, ModeTable, checked_byte};
use super::tables::*;
use crate::channels::{ChannelState, ChannelWrite};

/// Which of the two lasers a duplicated feature targets.
///
/// For distortion degree this selects picture 1 or 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Laser {
    #[default]
    One,
    Two,
}

impl TryFrom<u8> for Laser {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Laser::One),
            2 => Ok(Laser::Two),
            other => Err(format!("invalid laser {other}: must be 1 or 2")),
        }
    }
}

impl From<Laser> for u8 {
    fn from(laser: Laser) -> Self {
        match laser {
            Laser::One => 1,
            Laser::Two => 2,
        }
    }
}

impl fmt::Display for Laser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Pattern gallery on channel 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gallery {
    Beam,
    Animation,
}

impl Gallery {
    pub const ALL: [Gallery; 2] = [Gallery::Beam, Gallery::Animation];

    pub fn token(self) -> &'static str {
        match self {
            Gallery::Beam => "beam",
            Gallery::Animation => "animation",
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Gallery::Beam => layout::GALLERY_BEAM,
            Gallery::Animation => layout::GALLERY_ANIMATION,
        }
    }
}

impl TryFrom<u8> for Gallery {
    type Error = EncodeError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            0 => Ok(Gallery::Beam),
            1 => Ok(Gallery::Animation),
            other => Err(EncodeError::UnknownMode {
                feature: "gallery",
                mode: other.to_string(),
            }),
        }
    }
}

impl FromStr for Gallery {
    type Err = EncodeError;

    /// Accepts the tokens `beam`/`animation` and the numbers `0`/`1`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "beam" | "0" => Ok(Gallery::Beam),
            "animation" | "1" => Ok(Gallery::Animation),
            other => Err(EncodeError::UnknownMode {
                feature: "gallery",
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn table_write<M: ModeTable>(
    binding: Binding,
    laser: Laser,
    mode: M,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    let value = mode.resolve(value)?;
    Ok(ChannelWrite::new(binding.channel(laser), value))
}

fn raw_write(
    binding: Binding,
    laser: Laser,
    feature: &'static str,
    value: u16,
) -> Result<ChannelWrite, EncodeError> {
    let value = checked_byte(value, ModeRange::FULL, feature, "value")?;
    Ok(ChannelWrite::new(binding.channel(laser), value))
}

/// Lamp mode on channel 1.
///
/// # Examples
/// ```
/// use laserdmx_core::modes::{LampMode, lamp_mode};
///
/// let write = lamp_mode(LampMode::DynamicSound, None)?;
/// assert_eq!((write.channel, write.value), (1, 100));
/// # Ok::<(), laserdmx_core::EncodeError>(())
/// ```
pub fn lamp_mode(mode: LampMode, value: Option<u16>) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::LAMP_MODE, Laser::One, mode, value)
}

pub fn pattern_size(
    laser: Laser,
    mode: PatternSize,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::PATTERN_SIZE, laser, mode, value)
}

pub fn select_gallery(gallery: Gallery) -> ChannelWrite {
    ChannelWrite::new(layout::GALLERY.channel(Laser::One), gallery.value())
}

/// Pattern index; 0 plays every pattern in order.
pub fn select_pattern(laser: Laser, index: u16) -> Result<ChannelWrite, EncodeError> {
    raw_write(layout::PATTERN_SELECT, laser, "pattern_select", index)
}

/// # Examples
/// ```
/// use laserdmx_core::EncodeError;
/// use laserdmx_core::modes::{Laser, PatternZoom, pattern_zoom};
///
/// let write = pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(145))?;
/// assert_eq!((write.channel, write.value), (22, 145));
/// let err = pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(300)).unwrap_err();
/// assert!(matches!(err, EncodeError::ValueOutOfRange { .. }));
/// # Ok::<(), EncodeError>(())
/// ```
pub fn pattern_zoom(
    laser: Laser,
    mode: PatternZoom,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::PATTERN_ZOOM, laser, mode, value)
}

pub fn pattern_rotation(
    laser: Laser,
    mode: PatternRotation,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::PATTERN_ROTATION, laser, mode, value)
}

pub fn horizontal_movement(
    laser: Laser,
    mode: HorizontalMovement,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::HORIZONTAL_MOVEMENT, laser, mode, value)
}

pub fn vertical_movement(
    laser: Laser,
    mode: VerticalMovement,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::VERTICAL_MOVEMENT, laser, mode, value)
}

pub fn horizontal_zoom(
    mode: HorizontalZoom,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::HORIZONTAL_ZOOM, Laser::One, mode, value)
}

pub fn vertical_zoom(mode: VerticalZoom, value: Option<u16>) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::VERTICAL_ZOOM, Laser::One, mode, value)
}

/// Forced color; `change_every_n` requires N in `1..=255`.
pub fn forced_color(
    laser: Laser,
    mode: ForcedColor,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    if mode == ForcedColor::ChangeEveryN && value.is_none() {
        return Err(EncodeError::MissingRequiredValue {
            feature: ForcedColor::FEATURE,
            mode: mode.token(),
            what: "value for N",
        });
    }
    table_write(layout::FORCED_COLOR, laser, mode, value)
}

pub fn strobe(mode: Strobe, value: Option<u16>) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::STROBE, Laser::One, mode, value)
}

pub fn node_highlighting(
    laser: Laser,
    mode: NodeHighlighting,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::NODE_HIGHLIGHTING, laser, mode, value)
}

/// Node expansion on channel 14 (31 for laser 2).
///
/// While the companion gradual-drawing channel holds a dynamic mode
/// (`>= 128`) the device reads this channel as the delay after full
/// expansion, so `delay` is written instead of `expansion` and is required.
///
/// # Examples
/// ```
/// use laserdmx_core::ChannelState;
/// use laserdmx_core::modes::{Laser, node_expansion};
///
/// let mut state = ChannelState::default();
/// state.set_channel(15, 200)?;
/// assert!(node_expansion(&state, Laser::One, 50, None).is_err());
/// let write = node_expansion(&state, Laser::One, 50, Some(10))?;
/// assert_eq!((write.channel, write.value), (14, 10));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn node_expansion(
    state: &ChannelState,
    laser: Laser,
    expansion: u16,
    delay: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    const FEATURE: &str = "node_expansion";
    let expansion = checked_byte(expansion, ModeRange::FULL, FEATURE, "expansion")?;
    let companion = state.get_channel(layout::GRADUAL_DRAWING.channel(laser))?;
    let channel = layout::NODE_EXPANSION.channel(laser);

    if companion < layout::GRADUAL_DYNAMIC_THRESHOLD {
        return Ok(ChannelWrite::new(channel, expansion));
    }
    let delay = delay.ok_or(EncodeError::MissingRequiredValue {
        feature: FEATURE,
        mode: "delay",
        what: "delay value while gradual drawing is dynamic",
    })?;
    let delay = checked_byte(delay, ModeRange::FULL, FEATURE, "delay")?;
    Ok(ChannelWrite::new(channel, delay))
}

/// Gradual drawing on channel 15 (32 for laser 2).
///
/// The manual sub-modes need node expansion to be set first and carry a
/// manual expansion value (`0..=127` forward, `0..=63` reverse) that is
/// written as-is. The expansion channel is checked before the value, so a
/// manual request on a fresh array fails with `PreconditionNotMet` even
/// without a value. The dynamic sub-modes follow the table.
pub fn gradual_drawing(
    state: &ChannelState,
    laser: Laser,
    mode: GradualDrawing,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    let channel = layout::GRADUAL_DRAWING.channel(laser);
    let ceiling = match mode {
        GradualDrawing::ForwardManual => layout::FORWARD_MANUAL_CEILING,
        GradualDrawing::ReverseManual => layout::REVERSE_MANUAL_CEILING,
        _ => return table_write(layout::GRADUAL_DRAWING, laser, mode, value),
    };

    let expansion_channel = layout::NODE_EXPANSION.channel(laser);
    if state.get_channel(expansion_channel)? == 0 {
        return Err(EncodeError::PreconditionNotMet {
            feature: GradualDrawing::FEATURE,
            channel: expansion_channel,
        });
    }
    let value = value.ok_or(EncodeError::MissingRequiredValue {
        feature: GradualDrawing::FEATURE,
        mode: mode.token(),
        what: "manual expansion value",
    })?;
    let value = checked_byte(
        value,
        ModeRange::new(0, ceiling),
        GradualDrawing::FEATURE,
        mode.token(),
    )?;
    Ok(ChannelWrite::new(channel, value))
}

/// Distortion degree; `Laser::One` is picture 1 (channel 16), `Laser::Two`
/// picture 2 (channel 17).
pub fn distortion_degree(laser: Laser, degree: u16) -> Result<ChannelWrite, EncodeError> {
    raw_write(layout::DISTORTION_DEGREE, laser, "distortion_degree", degree)
}

/// 0 switches the second pattern off, 1..=255 lights it.
pub fn second_lamp_pattern(value: u16) -> Result<ChannelWrite, EncodeError> {
    raw_write(layout::SECOND_LAMP_PATTERN, Laser::One, "second_lamp_pattern", value)
}

pub fn pattern_library(mode: PatternLibrary) -> ChannelWrite {
    ChannelWrite::new(
        layout::PATTERN_LIBRARY.channel(Laser::One),
        mode.range().lo,
    )
}

pub fn horizontal_flip(
    mode: HorizontalFlip,
    value: Option<u16>,
) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::HORIZONTAL_FLIP, Laser::One, mode, value)
}

pub fn vertical_flip(mode: VerticalFlip, value: Option<u16>) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::VERTICAL_FLIP, Laser::One, mode, value)
}

pub fn color_change(mode: ColorChange, value: Option<u16>) -> Result<ChannelWrite, EncodeError> {
    table_write(layout::COLOR_CHANGE, Laser::One, mode, value)
}

/// Lamp off, as a single write to channel 1.
pub fn blackout() -> ChannelWrite {
    ChannelWrite::new(layout::LAMP_MODE.channel(Laser::One), LampMode::Off.range().lo)
}
