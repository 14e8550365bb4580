//! Projector session.
//!
//! A `Session` owns the channel state and the transport. Every setter
//! encodes its feature, applies the write and sends one full packet; all of
//! them take `&mut self`, so there is exactly one writer per session. When
//! encoding or the channel write fails nothing is applied and nothing is
//! sent. A transport failure leaves the state applied but unsent; the next
//! successful send carries it.

use thiserror::Error;
use tracing::{debug, trace};

use crate::channels::{ChannelError, ChannelState, ChannelWrite};
use crate::modes::{self, EncodeError, Gallery, Laser, ModeRequest};
use crate::packet::build_packet;
use crate::transport::{Transport, TransportError};
use crate::{StateReport, make_state_report};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Channel state plus the link it is sent over.
///
/// # Examples
/// ```
/// use laserdmx_core::modes::LampMode;
/// use laserdmx_core::{MemoryTransport, Session};
///
/// let mut session = Session::new(MemoryTransport::new());
/// session.set_lamp_mode(LampMode::DynamicSound, None)?;
/// assert_eq!(session.get_channel(1)?, 100);
/// assert_eq!(session.transport().packets().len(), 1);
/// # Ok::<(), laserdmx_core::SessionError>(())
/// ```
pub struct Session<T: Transport> {
    state: ChannelState,
    transport: T,
}

macro_rules! table_setter {
    ($(#[$meta:meta])* $name:ident => $encode:ident, laser, $mode:ty) => {
        $(#[$meta])*
        pub fn $name(
            &mut self,
            laser: Laser,
            mode: $mode,
            value: Option<u16>,
        ) -> Result<ChannelWrite, SessionError> {
            let write = modes::$encode(laser, mode, value)?;
            self.apply(write)
        }
    };
    ($(#[$meta:meta])* $name:ident => $encode:ident, $mode:ty) => {
        $(#[$meta])*
        pub fn $name(&mut self, mode: $mode, value: Option<u16>) -> Result<ChannelWrite, SessionError> {
            let write = modes::$encode(mode, value)?;
            self.apply(write)
        }
    };
}

impl<T: Transport> Session<T> {
    /// Session over the default 32 channels.
    pub fn new(transport: T) -> Self {
        Self::with_state(ChannelState::default(), transport)
    }

    pub fn with_state(state: ChannelState, transport: T) -> Self {
        Self { state, transport }
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get_channel(&self, channel: u16) -> Result<u8, SessionError> {
        Ok(self.state.get_channel(channel)?)
    }

    /// Write a raw channel value and send.
    pub fn set_channel(&mut self, channel: u16, value: u16) -> Result<(), SessionError> {
        self.state.set_channel(channel, value)?;
        self.send()
    }

    /// Frame the current state and hand it to the transport.
    pub fn send(&mut self) -> Result<(), SessionError> {
        let packet = build_packet(&self.state.snapshot());
        trace!(transport = self.transport.name(), packet = ?packet, "sending packet");
        self.transport.write(&packet)?;
        Ok(())
    }

    /// Apply an encoder result and send.
    pub fn apply(&mut self, write: ChannelWrite) -> Result<ChannelWrite, SessionError> {
        debug!(channel = write.channel, value = write.value, "applying write");
        self.state.apply(write)?;
        self.send()?;
        Ok(write)
    }

    /// Encode a text-level request against the current state, apply it and
    /// send.
    pub fn apply_request(&mut self, request: &ModeRequest<'_>) -> Result<ChannelWrite, SessionError> {
        let write = modes::encode_request(&self.state, request)?;
        self.apply(write)
    }

    table_setter!(set_lamp_mode => lamp_mode, modes::LampMode);
    table_setter!(set_pattern_size => pattern_size, laser, modes::PatternSize);

    pub fn select_gallery(&mut self, gallery: Gallery) -> Result<ChannelWrite, SessionError> {
        self.apply(modes::select_gallery(gallery))
    }

    pub fn select_pattern(&mut self, laser: Laser, index: u16) -> Result<ChannelWrite, SessionError> {
        let write = modes::select_pattern(laser, index)?;
        self.apply(write)
    }

    table_setter!(set_pattern_zoom => pattern_zoom, laser, modes::PatternZoom);
    table_setter!(set_pattern_rotation => pattern_rotation, laser, modes::PatternRotation);
    table_setter!(set_horizontal_movement => horizontal_movement, laser, modes::HorizontalMovement);
    table_setter!(set_vertical_movement => vertical_movement, laser, modes::VerticalMovement);
    table_setter!(set_horizontal_zoom => horizontal_zoom, modes::HorizontalZoom);
    table_setter!(set_vertical_zoom => vertical_zoom, modes::VerticalZoom);
    table_setter!(
        /// `change_every_n` requires `value` (N in `1..=255`).
        set_forced_color => forced_color, laser, modes::ForcedColor
    );
    table_setter!(set_strobe => strobe, modes::Strobe);
    table_setter!(set_node_highlighting => node_highlighting, laser, modes::NodeHighlighting);

    /// See `modes::node_expansion` for when `delay` is required.
    pub fn set_node_expansion(
        &mut self,
        laser: Laser,
        expansion: u16,
        delay: Option<u16>,
    ) -> Result<ChannelWrite, SessionError> {
        let write = modes::node_expansion(&self.state, laser, expansion, delay)?;
        self.apply(write)
    }

    /// See `modes::gradual_drawing` for the manual sub-mode rules.
    pub fn set_gradual_drawing(
        &mut self,
        laser: Laser,
        mode: modes::GradualDrawing,
        value: Option<u16>,
    ) -> Result<ChannelWrite, SessionError> {
        let write = modes::gradual_drawing(&self.state, laser, mode, value)?;
        self.apply(write)
    }

    pub fn set_distortion_degree(
        &mut self,
        laser: Laser,
        degree: u16,
    ) -> Result<ChannelWrite, SessionError> {
        let write = modes::distortion_degree(laser, degree)?;
        self.apply(write)
    }

    pub fn set_second_lamp_pattern(&mut self, value: u16) -> Result<ChannelWrite, SessionError> {
        let write = modes::second_lamp_pattern(value)?;
        self.apply(write)
    }

    pub fn set_pattern_library(
        &mut self,
        mode: modes::PatternLibrary,
    ) -> Result<ChannelWrite, SessionError> {
        self.apply(modes::pattern_library(mode))
    }

    table_setter!(set_horizontal_flip => horizontal_flip, modes::HorizontalFlip);
    table_setter!(set_vertical_flip => vertical_flip, modes::VerticalFlip);
    table_setter!(set_color_change => color_change, modes::ColorChange);

    /// Lamp off. Other channels keep their values.
    pub fn blackout(&mut self) -> Result<ChannelWrite, SessionError> {
        self.apply(modes::blackout())
    }

    /// Zero every channel and send.
    pub fn reset_all_channels(&mut self) -> Result<(), SessionError> {
        self.state.reset_all();
        self.send()
    }

    pub fn report(&self) -> StateReport {
        make_state_report(Some(self.transport.name()), &self.state)
    }

    pub fn close(&mut self) -> Result<(), SessionError> {
        self.transport.close()?;
        Ok(())
    }

    pub fn into_parts(self) -> (ChannelState, T) {
        (self.state, self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTransport;
    use crate::modes::{GradualDrawing, LampMode, PatternZoom};

    fn session() -> Session<MemoryTransport> {
        Session::new(MemoryTransport::new())
    }

    #[test]
    fn setter_sends_one_full_packet() {
        let mut session = session();
        let write = session
            .set_pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(145))
            .unwrap();
        assert_eq!(write, ChannelWrite::new(22, 145));
        let packets = session.transport().packets();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].len(), 33);
        assert_eq!(packets[0][22], 145);
    }

    #[test]
    fn failed_encode_applies_and_sends_nothing() {
        let mut session = session();
        let err = session
            .set_pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(300))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Encode(EncodeError::ValueOutOfRange { .. })
        ));
        assert_eq!(session.get_channel(22).unwrap(), 0);
        assert!(session.transport().packets().is_empty());
    }

    #[test]
    fn failed_set_channel_sends_nothing() {
        let mut session = session();
        assert!(session.set_channel(33, 1).is_err());
        assert!(session.set_channel(1, 256).is_err());
        assert!(session.transport().packets().is_empty());
    }

    #[test]
    fn blackout_only_touches_lamp_channel() {
        let mut session = session();
        session.set_lamp_mode(LampMode::Manual, Some(50)).unwrap();
        session.set_channel(12, 200).unwrap();
        session.blackout().unwrap();
        assert_eq!(session.get_channel(1).unwrap(), 0);
        assert_eq!(session.get_channel(12).unwrap(), 200);
    }

    #[test]
    fn reset_sends_all_zero_packet() {
        let mut session = session();
        session.set_channel(5, 9).unwrap();
        session.reset_all_channels().unwrap();
        let last = session.transport().last_packet().unwrap();
        assert!(last.iter().all(|b| *b == 0));
        assert_eq!(session.transport().packets().len(), 2);
    }

    #[test]
    fn manual_drawing_after_expansion_succeeds() {
        let mut session = session();
        let err = session
            .set_gradual_drawing(Laser::One, GradualDrawing::ForwardManual, Some(20))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Encode(EncodeError::PreconditionNotMet { .. })
        ));
        session.set_node_expansion(Laser::One, 40, None).unwrap();
        session
            .set_gradual_drawing(Laser::One, GradualDrawing::ForwardManual, Some(20))
            .unwrap();
        assert_eq!(session.get_channel(15).unwrap(), 20);
    }

    #[test]
    fn transport_failure_is_surfaced() {
        let mut session = session();
        session.close().unwrap();
        let err = session.blackout().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transport(TransportError::Closed)
        ));
    }

    #[test]
    fn report_names_transport() {
        let mut session = session();
        session.select_gallery(Gallery::Animation).unwrap();
        let report = session.report();
        assert_eq!(report.port.as_deref(), Some("memory"));
        assert_eq!(report.channels.get(3), Some(240));
        assert_eq!(report.packet_len, 33);
    }
}
