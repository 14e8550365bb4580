//! Projector channel map.
//!
//! Channel numbers are 1-indexed. Features duplicated across the two lasers
//! use a base channel for laser 1 and a fixed offset for laser 2.

use super::Laser;

/// Offset between the laser 1 and laser 2 copy of a duplicated feature.
pub const LASER_OFFSET: u16 = 17;

/// Target channel(s) of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Fixed(u16),
    PerLaser { base: u16, offset: u16 },
}

impl Binding {
    const fn per_laser(base: u16) -> Self {
        Binding::PerLaser {
            base,
            offset: LASER_OFFSET,
        }
    }

    pub const fn channel(self, laser: Laser) -> u16 {
        match (self, laser) {
            (Binding::Fixed(channel), _) => channel,
            (Binding::PerLaser { base, .. }, Laser::One) => base,
            (Binding::PerLaser { base, offset }, Laser::Two) => base + offset,
        }
    }

    pub const fn is_per_laser(self) -> bool {
        matches!(self, Binding::PerLaser { .. })
    }
}

pub const LAMP_MODE: Binding = Binding::Fixed(1);
pub const PATTERN_SIZE: Binding = Binding::per_laser(2);
pub const GALLERY: Binding = Binding::Fixed(3);
pub const PATTERN_SELECT: Binding = Binding::per_laser(4);
pub const PATTERN_ZOOM: Binding = Binding::per_laser(5);
pub const PATTERN_ROTATION: Binding = Binding::per_laser(6);
pub const HORIZONTAL_MOVEMENT: Binding = Binding::per_laser(7);
pub const VERTICAL_MOVEMENT: Binding = Binding::per_laser(8);
pub const HORIZONTAL_ZOOM: Binding = Binding::Fixed(9);
pub const VERTICAL_ZOOM: Binding = Binding::Fixed(10);
pub const FORCED_COLOR: Binding = Binding::per_laser(11);
pub const STROBE: Binding = Binding::Fixed(12);
pub const NODE_HIGHLIGHTING: Binding = Binding::per_laser(13);
pub const NODE_EXPANSION: Binding = Binding::per_laser(14);
pub const GRADUAL_DRAWING: Binding = Binding::per_laser(15);
/// Picture 1 on 16, picture 2 on 17.
pub const DISTORTION_DEGREE: Binding = Binding::PerLaser { base: 16, offset: 1 };
pub const SECOND_LAMP_PATTERN: Binding = Binding::Fixed(18);
pub const PATTERN_LIBRARY: Binding = Binding::Fixed(20);
pub const HORIZONTAL_FLIP: Binding = Binding::Fixed(26);
pub const VERTICAL_FLIP: Binding = Binding::Fixed(27);
pub const COLOR_CHANGE: Binding = Binding::Fixed(29);

/// Gallery channel value selecting the beam gallery.
pub const GALLERY_BEAM: u8 = 0;
/// Gallery channel value selecting the animation gallery.
pub const GALLERY_ANIMATION: u8 = 240;
/// Companion gradual-drawing value from which node expansion carries a delay.
pub const GRADUAL_DYNAMIC_THRESHOLD: u8 = 128;
/// Highest manual value accepted by `forward_manual`.
pub const FORWARD_MANUAL_CEILING: u8 = 127;
/// Highest manual value accepted by `reverse_manual`.
pub const REVERSE_MANUAL_CEILING: u8 = 63;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicated_features_sit_seventeen_channels_apart() {
        for binding in [
            PATTERN_SIZE,
            PATTERN_SELECT,
            PATTERN_ZOOM,
            PATTERN_ROTATION,
            HORIZONTAL_MOVEMENT,
            VERTICAL_MOVEMENT,
            FORCED_COLOR,
            NODE_HIGHLIGHTING,
            NODE_EXPANSION,
            GRADUAL_DRAWING,
        ] {
            assert_eq!(binding.channel(Laser::Two) - binding.channel(Laser::One), 17);
        }
    }

    #[test]
    fn fixed_binding_ignores_laser() {
        assert_eq!(STROBE.channel(Laser::One), 12);
        assert_eq!(STROBE.channel(Laser::Two), 12);
    }

    #[test]
    fn distortion_uses_adjacent_channels() {
        assert_eq!(DISTORTION_DEGREE.channel(Laser::One), 16);
        assert_eq!(DISTORTION_DEGREE.channel(Laser::Two), 17);
    }

    #[test]
    fn gradual_drawing_for_laser_two_is_last_default_channel() {
        assert_eq!(GRADUAL_DRAWING.channel(Laser::Two), 32);
    }
}
