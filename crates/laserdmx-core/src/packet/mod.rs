//! DMX packet framing.
//!
//! A frame is the start code followed by every channel byte, with no length
//! prefix, checksum or escaping. Framing is pure; writing the bytes out is
//! the transport's job.

pub mod error;
pub mod layout;

use crate::channels::ChannelArray;

pub use error::PacketError;

/// Frame a snapshot: `[0x00] ++ channels`.
///
/// # Examples
/// ```
/// use laserdmx_core::{ChannelState, build_packet};
///
/// let packet = build_packet(&ChannelState::default().snapshot());
/// assert_eq!(packet.len(), 33);
/// assert!(packet.iter().all(|b| *b == 0));
/// ```
pub fn build_packet(state: &ChannelArray) -> Vec<u8> {
    let mut packet = Vec::with_capacity(layout::DATA_OFFSET + state.len());
    packet.push(layout::START_CODE);
    packet.extend_from_slice(state.as_bytes());
    packet
}

/// Read a framed packet back into channel values.
///
/// # Errors
/// Returns `PacketError` when the frame carries no slot, more than one
/// universe of slots, or a non-null start code.
pub fn parse_packet(packet: &[u8]) -> Result<ChannelArray, PacketError> {
    let needed = layout::DATA_OFFSET + 1;
    if packet.len() < needed {
        return Err(PacketError::TooShort {
            needed,
            actual: packet.len(),
        });
    }
    let start_code = packet[layout::START_CODE_OFFSET];
    if start_code != layout::START_CODE {
        return Err(PacketError::InvalidStartCode { value: start_code });
    }
    let slots = &packet[layout::DATA_OFFSET..];
    if slots.len() > layout::DMX_MAX_SLOTS {
        return Err(PacketError::TooLong {
            slots: slots.len(),
            max: layout::DMX_MAX_SLOTS,
        });
    }
    Ok(ChannelArray::from_vec(slots.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelState;

    #[test]
    fn all_zero_state_frames_to_33_zero_bytes() {
        let packet = build_packet(&ChannelState::default().snapshot());
        assert_eq!(packet.len(), 33);
        assert_eq!(packet[0], 0x00);
        assert!(packet[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn channel_n_lands_at_byte_n() {
        let mut state = ChannelState::default();
        state.set_channel(1, 100).unwrap();
        state.set_channel(22, 145).unwrap();
        let packet = build_packet(&state.snapshot());
        assert_eq!(packet[1], 100);
        assert_eq!(packet[22], 145);
    }

    #[test]
    fn packet_length_follows_channel_count() {
        let state = ChannelState::new(512).unwrap();
        assert_eq!(build_packet(&state.snapshot()).len(), 513);
    }

    #[test]
    fn parse_reads_back_built_packet() {
        let mut state = ChannelState::default();
        state.set_channel(3, 240).unwrap();
        let snapshot = state.snapshot();
        let parsed = parse_packet(&build_packet(&snapshot)).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn parse_rejects_bare_start_code() {
        let err = parse_packet(&[0x00]).unwrap_err();
        assert_eq!(err, PacketError::TooShort { needed: 2, actual: 1 });
    }

    #[test]
    fn parse_rejects_alternate_start_code() {
        let err = parse_packet(&[0xcc, 1, 2]).unwrap_err();
        assert!(err.to_string().contains("invalid start code: 0xcc"));
    }

    #[test]
    fn parse_rejects_more_than_one_universe() {
        let packet = vec![0u8; layout::DMX_MAX_SLOTS + 2];
        let err = parse_packet(&packet).unwrap_err();
        assert!(matches!(err, PacketError::TooLong { slots: 513, .. }));
    }
}
