//! Outbound byte stream to the projector.
//!
//! The core hands every framed packet to a `Transport`. `SerialTransport`
//! drives a USB-DMX interface; `MemoryTransport` records packets for tests
//! and dry runs. Blocking I/O lives only here.

pub mod error;
mod memory;
mod serial;

pub use error::TransportError;
pub use memory::MemoryTransport;
pub use serial::{PortInfo, SerialTransport, available_ports, find_dmx_port};

/// Write side of a DMX link.
pub trait Transport {
    /// Identifier of the link (port name, or a fixed label).
    fn name(&self) -> &str;

    /// Write one framed packet.
    fn write(&mut self, packet: &[u8]) -> Result<(), TransportError>;

    /// Release the link. Writes after closing fail with
    /// `TransportError::Closed`.
    fn close(&mut self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&mut self, packet: &[u8]) -> Result<(), TransportError> {
        (**self).write(packet)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}
