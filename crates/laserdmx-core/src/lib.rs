//! laserdmx core library for driving a two-laser DMX512 projector.
//!
//! The crate keeps one channel array per session, translates named device
//! modes into channel writes and frames the array into DMX packets:
//! `modes` resolves a feature/mode/value into a `(channel, value)` pair,
//! `channels` holds the state it is applied to, `packet` frames the state,
//! and `transport` carries the frame to the device. `session` ties the four
//! together behind a single owner.
//!
//! Invariants:
//! - The channel array never changes length and every value is a byte.
//! - A failed encode or channel write leaves the array untouched.
//! - An unset mode value resolves to the lower bound of its range.
//! - Every packet is the null start code followed by all channels.
//!
//! # Examples
//! ```
//! use laserdmx_core::modes::{Laser, PatternZoom};
//! use laserdmx_core::{MemoryTransport, Session};
//!
//! let mut session = Session::new(MemoryTransport::new());
//! session.set_pattern_zoom(Laser::Two, PatternZoom::ZoomIn, Some(145))?;
//! let packet = session.transport().last_packet().unwrap();
//! assert_eq!(packet.len(), 33);
//! assert_eq!(packet[22], 145);
//! # Ok::<(), laserdmx_core::SessionError>(())
//! ```

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub mod channels;
pub mod config;
pub mod modes;
pub mod packet;
pub mod session;
pub mod transport;

pub use channels::{
    ChannelArray, ChannelError, ChannelState, ChannelWrite, DEFAULT_CHANNEL_COUNT, MAX_CHANNELS,
};
pub use config::{SerialConfig, SessionConfig};
pub use modes::EncodeError;
pub use packet::{PacketError, build_packet, parse_packet};
pub use session::{Session, SessionError};
pub use transport::{
    MemoryTransport, PortInfo, SerialTransport, Transport, TransportError, available_ports,
    find_dmx_port,
};

/// Current state report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Timestamp used when the clock cannot be formatted.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Snapshot of a session, as emitted by drivers.
///
/// # Examples
/// ```
/// use laserdmx_core::{ChannelState, make_state_report};
///
/// let report = make_state_report(None, &ChannelState::default());
/// assert_eq!(report.report_version, laserdmx_core::REPORT_VERSION);
/// assert_eq!(report.packet_len, 33);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateReport {
    /// Report schema version (not the crate version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC 3339 UTC time the report was taken.
    pub generated_at: String,
    /// Transport the state was sent over, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub channel_count: usize,
    /// Channel values, index 0 = channel 1.
    pub channels: ChannelArray,
    /// Length of the framed packet (start code included).
    pub packet_len: usize,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

pub fn make_state_report(port: Option<&str>, state: &ChannelState) -> StateReport {
    let channels = state.snapshot();
    StateReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "laserdmx".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string()),
        port: port.map(str::to_string),
        channel_count: channels.len(),
        packet_len: build_packet(&channels).len(),
        channels,
    }
}
