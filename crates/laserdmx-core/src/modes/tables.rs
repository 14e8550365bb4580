//! Mode tables of the projector, one enum per feature.

use super::table::mode_table;

mode_table! {
    /// Channel 1: lamp on/off and program source.
    LampMode, "lamp_mode" {
        Off => "off", 0..=0;
        Manual => "manual", 1..=99;
        DynamicSound => "dynamic_sound", 100..=199;
        TuneProgram => "tune_program", 200..=219;
        SoundProgram => "sound_program", 220..=249;
        OffEnd => "off_end", 250..=255;
    }
}

mode_table! {
    /// Out-of-bounds handling of the pattern.
    PatternSize, "pattern_size" {
        PartsBlank => "parts_blank", 0..=49;
        Returns => "returns", 50..=99;
        Folds => "folds", 100..=149;
        Crossing => "crossing", 150..=199;
        Blanking => "blanking", 200..=255;
    }
}

mode_table! {
    PatternZoom, "pattern_zoom" {
        Static => "static", 0..=127;
        ZoomIn => "zoom_in", 128..=159;
        ZoomOut => "zoom_out", 160..=191;
        FlipZooming => "flip_zooming", 192..=255;
    }
}

mode_table! {
    PatternRotation, "pattern_rotation" {
        Static => "static", 0..=127;
        /// The device documents two sub-ranges here with one behavior.
        DynamicInversion => "dynamic_inversion", 128..=255;
    }
}

mode_table! {
    HorizontalMovement, "horizontal_movement" {
        Static => "static", 0..=127;
        PushUp => "push_up", 128..=159;
        PushDown => "push_down", 160..=191;
        LeftShift => "left_shift", 192..=223;
        RightShift => "right_shift", 224..=255;
    }
}

mode_table! {
    VerticalMovement, "vertical_movement" {
        Static => "static", 0..=127;
        RightPush => "right_push", 128..=159;
        LeftPush => "left_push", 160..=191;
        MoveUp => "move_up", 192..=223;
        MoveDown => "move_down", 224..=255;
    }
}

mode_table! {
    /// Channel 9, shared by both lasers.
    HorizontalZoom, "horizontal_zoom" {
        Static => "static", 0..=127;
        PushUpDistortion => "push_up_distortion", 128..=159;
        PushDownDistortion => "push_down_distortion", 160..=191;
        Zooming => "zooming", 192..=223;
        FlipZooming => "flip_zooming", 224..=255;
    }
}

mode_table! {
    /// Channel 10, shared by both lasers.
    VerticalZoom, "vertical_zoom" {
        Static => "static", 0..=127;
        RightPushDistortion => "right_push_distortion", 128..=159;
        LeftPushDistortion => "left_push_distortion", 160..=191;
        Zoom => "zoom", 192..=223;
        DynamicFlipZooming => "dynamic_flip_zooming", 224..=255;
    }
}

mode_table! {
    /// `change_every_n` carries N and has no default.
    ForcedColor, "forced_color" {
        Primary => "primary", 0..=0;
        ChangeEveryN => "change_every_n", 1..=255;
    }
}

mode_table! {
    Strobe, "strobe" {
        Off => "off", 0..=15;
        Strobe => "strobe", 16..=131;
        RandomFlash => "random_flash", 132..=147;
        SoundStrobe => "sound_strobe", 148..=199;
        SoundRandomFlash => "sound_random_flash", 200..=215;
        On => "on", 216..=255;
    }
}

mode_table! {
    /// 224..=255 is left unused.
    NodeHighlighting, "node_highlighting" {
        Brighter => "brighter", 0..=63;
        BrokenLines => "broken_lines", 64..=127;
        ScanningLine => "scanning_line", 128..=223;
    }
}

mode_table! {
    /// The manual sub-modes write a manual expansion value instead of a
    /// value from their range; see `gradual_drawing`.
    GradualDrawing, "gradual_drawing" {
        ForwardManual => "forward_manual", 0..=63;
        ReverseManual => "reverse_manual", 64..=127;
        DynamicA => "dynamic_a", 128..=159;
        DynamicB => "dynamic_b", 160..=191;
        DynamicC => "dynamic_c", 192..=223;
        DynamicD => "dynamic_d", 224..=255;
    }
}

mode_table! {
    /// Channel 20 has no device function; only the beam library exists.
    PatternLibrary, "pattern_library" {
        Default => "default", 0..=0;
    }
}

mode_table! {
    /// 224..=255 is unassigned.
    HorizontalFlip, "horizontal_flip" {
        Static => "static", 0..=127;
        PushUpDistortion => "push_up_distortion", 128..=159;
        PushDownDistortion => "push_down_distortion", 160..=191;
        Flip => "flip", 192..=223;
    }
}

mode_table! {
    VerticalFlip, "vertical_flip" {
        Static => "static", 0..=127;
        RightPushDistortion => "right_push_distortion", 128..=159;
        LeftPushDistortion => "left_push_distortion", 160..=191;
        Flip => "flip", 192..=255;
    }
}

mode_table! {
    ColorChange, "color_change" {
        Primary => "primary", 0..=7;
        White => "white", 8..=15;
        Red => "red", 16..=23;
        Yellow => "yellow", 24..=31;
        Green => "green", 32..=39;
        Indigo => "indigo", 40..=47;
        Blue => "blue", 48..=55;
        Purple => "purple", 56..=63;
        RgbCycle => "rgb_cycle", 64..=95;
        YipCycle => "yip_cycle", 96..=127;
        FullColorCycle => "full_color_cycle", 128..=159;
        ColorfulChange => "colorful_change", 160..=191;
        ForwardMovement => "forward_movement", 192..=223;
        ReverseMovement => "reverse_movement", 224..=255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::table::ModeTable;

    fn assert_ordered_and_disjoint<M: ModeTable>() {
        let mut previous_hi: Option<u8> = None;
        for mode in M::ALL {
            let range = mode.range();
            assert!(range.lo <= range.hi, "{} {}", M::FEATURE, mode.token());
            if let Some(hi) = previous_hi {
                assert_eq!(u16::from(hi) + 1, u16::from(range.lo), "{}", M::FEATURE);
            }
            previous_hi = Some(range.hi);
        }
    }

    #[test]
    fn tables_are_contiguous_from_zero() {
        assert_ordered_and_disjoint::<LampMode>();
        assert_ordered_and_disjoint::<PatternSize>();
        assert_ordered_and_disjoint::<PatternZoom>();
        assert_ordered_and_disjoint::<PatternRotation>();
        assert_ordered_and_disjoint::<HorizontalMovement>();
        assert_ordered_and_disjoint::<VerticalMovement>();
        assert_ordered_and_disjoint::<HorizontalZoom>();
        assert_ordered_and_disjoint::<VerticalZoom>();
        assert_ordered_and_disjoint::<ForcedColor>();
        assert_ordered_and_disjoint::<Strobe>();
        assert_ordered_and_disjoint::<NodeHighlighting>();
        assert_ordered_and_disjoint::<GradualDrawing>();
        assert_ordered_and_disjoint::<HorizontalFlip>();
        assert_ordered_and_disjoint::<VerticalFlip>();
        assert_ordered_and_disjoint::<ColorChange>();
    }

    #[test]
    fn scanning_line_keeps_wide_range() {
        let range = NodeHighlighting::ScanningLine.range();
        assert_eq!((range.lo, range.hi), (128, 223));
    }

    #[test]
    fn horizontal_flip_leaves_top_unassigned() {
        assert_eq!(HorizontalFlip::Flip.range().hi, 223);
        assert_eq!(VerticalFlip::Flip.range().hi, 255);
    }

    #[test]
    fn tokens_are_unique_per_feature() {
        let tokens: Vec<_> = ColorChange::ALL.iter().map(|m| m.token()).collect();
        let mut deduped = tokens.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(tokens.len(), deduped.len());
    }

    #[test]
    fn parses_tokens_to_variants() {
        assert_eq!("dynamic_sound".parse::<LampMode>().unwrap(), LampMode::DynamicSound);
        assert_eq!("dynamic_a".parse::<GradualDrawing>().unwrap(), GradualDrawing::DynamicA);
        assert!("dynamic_A".parse::<GradualDrawing>().is_err());
    }
}
