//! String-keyed access to the encoder.
//!
//! Drivers that receive feature and mode names as text (command line,
//! scripts) go through `encode_request`; typed callers use the per-feature
//! functions directly.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::encoder::{self, Gallery, Laser};
use super::error::EncodeError;
use super::layout::{self, Binding};
use super::table::{ModeRange, ModeTable};
use super::tables::*;
use crate::channels::{ChannelState, ChannelWrite};

macro_rules! features {
    ($($variant:ident => $token:literal, $binding:expr;)+) => {
        /// Every addressable projector feature.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Feature {
            $($variant,)+
        }

        impl Feature {
            pub const ALL: &'static [Feature] = &[$(Feature::$variant),+];

            pub fn token(self) -> &'static str {
                match self {
                    $(Feature::$variant => $token,)+
                }
            }

            pub fn binding(self) -> Binding {
                match self {
                    $(Feature::$variant => $binding,)+
                }
            }
        }
    };
}

features! {
    LampMode => "lamp_mode", layout::LAMP_MODE;
    PatternSize => "pattern_size", layout::PATTERN_SIZE;
    Gallery => "gallery", layout::GALLERY;
    PatternSelect => "pattern_select", layout::PATTERN_SELECT;
    PatternZoom => "pattern_zoom", layout::PATTERN_ZOOM;
    PatternRotation => "pattern_rotation", layout::PATTERN_ROTATION;
    HorizontalMovement => "horizontal_movement", layout::HORIZONTAL_MOVEMENT;
    VerticalMovement => "vertical_movement", layout::VERTICAL_MOVEMENT;
    HorizontalZoom => "horizontal_zoom", layout::HORIZONTAL_ZOOM;
    VerticalZoom => "vertical_zoom", layout::VERTICAL_ZOOM;
    ForcedColor => "forced_color", layout::FORCED_COLOR;
    Strobe => "strobe", layout::STROBE;
    NodeHighlighting => "node_highlighting", layout::NODE_HIGHLIGHTING;
    NodeExpansion => "node_expansion", layout::NODE_EXPANSION;
    GradualDrawing => "gradual_drawing", layout::GRADUAL_DRAWING;
    DistortionDegree => "distortion_degree", layout::DISTORTION_DEGREE;
    SecondLampPattern => "second_lamp_pattern", layout::SECOND_LAMP_PATTERN;
    PatternLibrary => "pattern_library", layout::PATTERN_LIBRARY;
    HorizontalFlip => "horizontal_flip", layout::HORIZONTAL_FLIP;
    VerticalFlip => "vertical_flip", layout::VERTICAL_FLIP;
    ColorChange => "color_change", layout::COLOR_CHANGE;
}

/// One row of a feature's mode listing.
#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub mode: &'static str,
    pub lo: u8,
    pub hi: u8,
}

fn rows<M: ModeTable>() -> Vec<ModeInfo> {
    M::ALL
        .iter()
        .map(|mode| {
            let ModeRange { lo, hi } = mode.range();
            ModeInfo {
                mode: mode.token(),
                lo,
                hi,
            }
        })
        .collect()
}

impl Feature {
    /// Named modes of this feature; empty for raw-valued features.
    pub fn modes(self) -> Vec<ModeInfo> {
        match self {
            Feature::LampMode => rows::<LampMode>(),
            Feature::PatternSize => rows::<PatternSize>(),
            Feature::Gallery => Gallery::ALL
                .iter()
                .map(|gallery| ModeInfo {
                    mode: gallery.token(),
                    lo: gallery.value(),
                    hi: gallery.value(),
                })
                .collect(),
            Feature::PatternZoom => rows::<PatternZoom>(),
            Feature::PatternRotation => rows::<PatternRotation>(),
            Feature::HorizontalMovement => rows::<HorizontalMovement>(),
            Feature::VerticalMovement => rows::<VerticalMovement>(),
            Feature::HorizontalZoom => rows::<HorizontalZoom>(),
            Feature::VerticalZoom => rows::<VerticalZoom>(),
            Feature::ForcedColor => rows::<ForcedColor>(),
            Feature::Strobe => rows::<Strobe>(),
            Feature::NodeHighlighting => rows::<NodeHighlighting>(),
            Feature::GradualDrawing => rows::<GradualDrawing>(),
            Feature::PatternLibrary => rows::<PatternLibrary>(),
            Feature::HorizontalFlip => rows::<HorizontalFlip>(),
            Feature::VerticalFlip => rows::<VerticalFlip>(),
            Feature::ColorChange => rows::<ColorChange>(),
            Feature::PatternSelect
            | Feature::NodeExpansion
            | Feature::DistortionDegree
            | Feature::SecondLampPattern => Vec::new(),
        }
    }

    /// Whether the feature takes a mode name (as opposed to a raw value).
    pub fn takes_mode(self) -> bool {
        !matches!(
            self,
            Feature::PatternSelect
                | Feature::NodeExpansion
                | Feature::DistortionDegree
                | Feature::SecondLampPattern
        )
    }
}

impl FromStr for Feature {
    type Err = EncodeError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|feature| feature.token() == token)
            .ok_or_else(|| EncodeError::UnknownFeature {
                name: token.to_string(),
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A text-level request: feature, laser, optional mode and values.
///
/// For raw-valued features `value` carries the byte (expansion value for
/// `node_expansion`) and `mode` is ignored; `delay` is only read by
/// `node_expansion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRequest<'a> {
    pub feature: Feature,
    pub laser: Laser,
    pub mode: Option<&'a str>,
    pub value: Option<u16>,
    pub delay: Option<u16>,
}

impl<'a> ModeRequest<'a> {
    pub fn new(feature: Feature) -> Self {
        Self {
            feature,
            laser: Laser::One,
            mode: None,
            value: None,
            delay: None,
        }
    }

    pub fn laser(mut self, laser: Laser) -> Self {
        self.laser = laser;
        self
    }

    pub fn mode(mut self, mode: &'a str) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn value(mut self, value: u16) -> Self {
        self.value = Some(value);
        self
    }

    pub fn delay(mut self, delay: u16) -> Self {
        self.delay = Some(delay);
        self
    }

    fn parse_mode<M: ModeTable>(&self) -> Result<M, EncodeError> {
        M::parse(self.required_mode(M::FEATURE)?)
    }

    fn required_mode(&self, feature: &'static str) -> Result<&'a str, EncodeError> {
        self.mode.ok_or(EncodeError::MissingRequiredValue {
            feature,
            mode: "-",
            what: "mode",
        })
    }

    fn required_value(&self) -> Result<u16, EncodeError> {
        self.value.ok_or(EncodeError::MissingRequiredValue {
            feature: self.feature.token(),
            mode: "-",
            what: "value",
        })
    }
}

/// Resolve a text-level request against the current state.
///
/// # Examples
/// ```
/// use laserdmx_core::ChannelState;
/// use laserdmx_core::modes::{Feature, Laser, ModeRequest, encode_request};
///
/// let state = ChannelState::default();
/// let request = ModeRequest::new(Feature::PatternZoom)
///     .laser(Laser::Two)
///     .mode("zoom_in")
///     .value(145);
/// let write = encode_request(&state, &request)?;
/// assert_eq!((write.channel, write.value), (22, 145));
/// # Ok::<(), laserdmx_core::EncodeError>(())
/// ```
///
/// # Errors
/// Any `EncodeError` of the underlying feature encoder, plus
/// `MissingRequiredValue` when a mode or raw value is absent.
pub fn encode_request(
    state: &ChannelState,
    request: &ModeRequest<'_>,
) -> Result<ChannelWrite, EncodeError> {
    let laser = request.laser;
    let value = request.value;
    match request.feature {
        Feature::LampMode => encoder::lamp_mode(request.parse_mode()?, value),
        Feature::PatternSize => encoder::pattern_size(laser, request.parse_mode()?, value),
        Feature::Gallery => {
            let gallery: Gallery = request.required_mode("gallery")?.parse()?;
            Ok(encoder::select_gallery(gallery))
        }
        Feature::PatternSelect => encoder::select_pattern(laser, request.required_value()?),
        Feature::PatternZoom => encoder::pattern_zoom(laser, request.parse_mode()?, value),
        Feature::PatternRotation => {
            encoder::pattern_rotation(laser, request.parse_mode()?, value)
        }
        Feature::HorizontalMovement => {
            encoder::horizontal_movement(laser, request.parse_mode()?, value)
        }
        Feature::VerticalMovement => {
            encoder::vertical_movement(laser, request.parse_mode()?, value)
        }
        Feature::HorizontalZoom => encoder::horizontal_zoom(request.parse_mode()?, value),
        Feature::VerticalZoom => encoder::vertical_zoom(request.parse_mode()?, value),
        Feature::ForcedColor => encoder::forced_color(laser, request.parse_mode()?, value),
        Feature::Strobe => encoder::strobe(request.parse_mode()?, value),
        Feature::NodeHighlighting => {
            encoder::node_highlighting(laser, request.parse_mode()?, value)
        }
        Feature::NodeExpansion => {
            encoder::node_expansion(state, laser, request.required_value()?, request.delay)
        }
        Feature::GradualDrawing => {
            encoder::gradual_drawing(state, laser, request.parse_mode()?, value)
        }
        Feature::DistortionDegree => encoder::distortion_degree(laser, request.required_value()?),
        Feature::SecondLampPattern => encoder::second_lamp_pattern(request.required_value()?),
        Feature::PatternLibrary => Ok(encoder::pattern_library(request.parse_mode()?)),
        Feature::HorizontalFlip => encoder::horizontal_flip(request.parse_mode()?, value),
        Feature::VerticalFlip => encoder::vertical_flip(request.parse_mode()?, value),
        Feature::ColorChange => encoder::color_change(request.parse_mode()?, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_tokens_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(feature.token().parse::<Feature>().unwrap(), *feature);
        }
        assert_eq!(Feature::ALL.len(), 21);
    }

    #[test]
    fn unknown_feature_is_reported() {
        let err = "laser_beam".parse::<Feature>().unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnknownFeature {
                name: "laser_beam".to_string()
            }
        );
    }

    #[test]
    fn unknown_mode_is_reported_with_feature() {
        let state = ChannelState::default();
        let request = ModeRequest::new(Feature::Strobe).mode("disco");
        let err = encode_request(&state, &request).unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnknownMode {
                feature: "strobe",
                mode: "disco".to_string()
            }
        );
    }

    #[test]
    fn table_feature_without_mode_is_rejected() {
        let state = ChannelState::default();
        let err = encode_request(&state, &ModeRequest::new(Feature::ColorChange)).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::MissingRequiredValue { what: "mode", .. }
        ));
    }

    #[test]
    fn raw_feature_without_value_is_rejected() {
        let state = ChannelState::default();
        let err =
            encode_request(&state, &ModeRequest::new(Feature::PatternSelect)).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::MissingRequiredValue { what: "value", .. }
        ));
    }

    #[test]
    fn node_expansion_request_carries_delay() {
        let mut state = ChannelState::default();
        state.set_channel(15, 200).unwrap();
        let request = ModeRequest::new(Feature::NodeExpansion).value(50).delay(10);
        assert_eq!(
            encode_request(&state, &request).unwrap(),
            ChannelWrite::new(14, 10)
        );
    }

    #[test]
    fn gallery_request_accepts_number_or_token() {
        let state = ChannelState::default();
        let by_token = ModeRequest::new(Feature::Gallery).mode("animation");
        let by_number = ModeRequest::new(Feature::Gallery).mode("1");
        assert_eq!(
            encode_request(&state, &by_token).unwrap(),
            encode_request(&state, &by_number).unwrap()
        );
    }

    #[test]
    fn listings_cover_table_features_only() {
        for feature in Feature::ALL {
            assert_eq!(feature.takes_mode(), !feature.modes().is_empty(), "{feature}");
        }
        let zoom = Feature::PatternZoom.modes();
        assert_eq!(zoom[1].mode, "zoom_in");
        assert_eq!((zoom[1].lo, zoom[1].hi), (128, 159));
    }

    #[test]
    fn bindings_match_channel_map() {
        assert_eq!(Feature::ColorChange.binding().channel(Laser::One), 29);
        assert_eq!(Feature::NodeExpansion.binding().channel(Laser::Two), 31);
        assert!(!Feature::Strobe.binding().is_per_laser());
    }
}
