use super::{Transport, TransportError};

/// Records every packet instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    packets: Vec<Vec<u8>>,
    closed: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packets(&self) -> &[Vec<u8>] {
        &self.packets
    }

    pub fn last_packet(&self) -> Option<&[u8]> {
        self.packets.last().map(Vec::as_slice)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&mut self, packet: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.packets.push(packet.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        Ok(())
    }
}
