use laserdmx_core::modes::{
    self, Feature, GradualDrawing, LampMode, Laser, ModeRequest, PatternZoom, encode_request,
};
use laserdmx_core::{
    ChannelError, ChannelState, EncodeError, MemoryTransport, Session, SessionError,
    build_packet, parse_packet,
};

#[test]
fn set_then_get_round_trips_for_every_channel_and_value() {
    let mut state = ChannelState::default();
    for channel in 1..=32u16 {
        for value in 0..=255u16 {
            state.set_channel(channel, value).unwrap();
            assert_eq!(state.get_channel(channel).unwrap(), value as u8);
        }
    }
}

#[test]
fn invalid_writes_fail_with_out_of_range_and_change_nothing() {
    let mut state = ChannelState::default();
    state.set_channel(7, 77).unwrap();
    let before = state.snapshot();

    for (channel, value) in [(0u16, 1u16), (33, 1), (1, 256), (32, 1000)] {
        let err = state.set_channel(channel, value).unwrap_err();
        assert!(matches!(err, ChannelError::OutOfRange { .. }));
    }
    assert_eq!(state.snapshot(), before);
}

#[test]
fn reset_then_snapshot_is_all_zero() {
    let mut state = ChannelState::default();
    state.set_channel(1, 255).unwrap();
    state.reset_all();
    let snapshot = state.snapshot();
    assert_eq!(snapshot.len(), 32);
    assert!(snapshot.as_bytes().iter().all(|v| *v == 0));
}

#[test]
fn all_zero_packet_is_33_zero_bytes() {
    let packet = build_packet(&ChannelState::default().snapshot());
    assert_eq!(packet, vec![0u8; 33]);
}

#[test]
fn dynamic_sound_resolves_to_channel_1_value_100() {
    let write = modes::lamp_mode(LampMode::DynamicSound, None).unwrap();
    assert_eq!((write.channel, write.value), (1, 100));
}

#[test]
fn zoom_in_for_laser_two() {
    let write = modes::pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(145)).unwrap();
    assert_eq!((write.channel, write.value), (22, 145));

    let err = modes::pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(300)).unwrap_err();
    assert!(matches!(err, EncodeError::ValueOutOfRange { .. }));
}

#[test]
fn node_expansion_carries_delay_while_drawing_is_dynamic() {
    let mut state = ChannelState::default();
    state.set_channel(15, 200).unwrap();

    let err = modes::node_expansion(&state, Laser::One, 50, None).unwrap_err();
    assert!(matches!(err, EncodeError::MissingRequiredValue { .. }));

    let write = modes::node_expansion(&state, Laser::One, 50, Some(10)).unwrap();
    assert_eq!((write.channel, write.value), (14, 10));
}

#[test]
fn forward_manual_without_expansion_is_rejected() {
    let state = ChannelState::default();
    for value in [None, Some(10)] {
        let err = modes::gradual_drawing(&state, Laser::One, GradualDrawing::ForwardManual, value)
            .unwrap_err();
        assert!(matches!(err, EncodeError::PreconditionNotMet { .. }));
    }
}

#[test]
fn text_requests_match_typed_encoders() {
    let state = ChannelState::default();
    let request = ModeRequest::new(Feature::LampMode).mode("dynamic_sound");
    assert_eq!(
        encode_request(&state, &request).unwrap(),
        modes::lamp_mode(LampMode::DynamicSound, None).unwrap()
    );

    let request = ModeRequest::new(Feature::LampMode).mode("party");
    let err = encode_request(&state, &request).unwrap_err();
    assert!(matches!(err, EncodeError::UnknownMode { .. }));
}

#[test]
fn session_packets_decode_back_to_state() {
    let mut session = Session::new(MemoryTransport::new());
    session.set_lamp_mode(LampMode::DynamicSound, None).unwrap();
    session
        .set_pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(145))
        .unwrap();

    let last = session.transport().last_packet().unwrap().to_vec();
    let decoded = parse_packet(&last).unwrap();
    assert_eq!(decoded, session.state().snapshot());
    assert_eq!(decoded.get(1), Some(100));
    assert_eq!(decoded.get(22), Some(145));
}

#[test]
fn session_with_short_array_rejects_upper_channels() {
    let state = ChannelState::new(16).unwrap();
    let mut session = Session::with_state(state, MemoryTransport::new());
    let err = session
        .set_pattern_zoom(Laser::Two, PatternZoom::Static, None)
        .unwrap_err();
    assert!(matches!(err, SessionError::Channel(_)));
    assert!(session.transport().packets().is_empty());

    let (state, transport) = session.into_parts();
    assert_eq!(state.len(), 16);
    assert!(transport.packets().is_empty());
}
