use std::io::Write;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info, trace};

use super::{Transport, TransportError};
use crate::config::SerialConfig;

/// A serial port as seen by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub name: String,
    /// `usb`, `pci`, `bluetooth` or `unknown`.
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PortInfo {
    fn from_serialport(info: serialport::SerialPortInfo) -> Self {
        let (kind, description) = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let description = match (usb.manufacturer, usb.product) {
                    (Some(manufacturer), Some(product)) => Some(format!("{manufacturer} {product}")),
                    (manufacturer, product) => product.or(manufacturer),
                };
                ("usb", description)
            }
            SerialPortType::PciPort => ("pci", None),
            SerialPortType::BluetoothPort => ("bluetooth", None),
            SerialPortType::Unknown => ("unknown", None),
        };
        Self {
            name: info.port_name,
            kind,
            description,
        }
    }

    /// USB ports, or ports whose name or description mentions USB or serial.
    pub fn looks_like_dmx(&self) -> bool {
        if self.kind == "usb" {
            return true;
        }
        let mentions = |text: &str| {
            let text = text.to_ascii_uppercase();
            text.contains("USB") || text.contains("SERIAL")
        };
        mentions(&self.name) || self.description.as_deref().is_some_and(mentions)
    }
}

/// List the serial ports of this machine.
///
/// # Errors
/// Returns `TransportError::Discovery` when the OS enumeration fails.
pub fn available_ports() -> Result<Vec<PortInfo>, TransportError> {
    let ports = serialport::available_ports().map_err(TransportError::Discovery)?;
    Ok(ports.into_iter().map(PortInfo::from_serialport).collect())
}

/// First port that looks like a USB-DMX interface.
pub fn find_dmx_port(ports: &[PortInfo]) -> Option<&PortInfo> {
    ports.iter().find(|port| port.looks_like_dmx())
}

/// DMX over a USB serial interface (8 data bits, no parity, 2 stop bits).
pub struct SerialTransport {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Open the configured port, or the first discovered DMX port when none
    /// is configured, then wait `settle_ms` for the interface to come up.
    ///
    /// # Errors
    /// Returns `TransportError::NoPortFound` when discovery finds nothing and
    /// `TransportError::Open` when the port cannot be opened.
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let name = match &config.port {
            Some(port) => port.clone(),
            None => {
                let ports = available_ports()?;
                let found = find_dmx_port(&ports).ok_or(TransportError::NoPortFound)?;
                debug!(port = %found.name, "auto-detected DMX port");
                found.name.clone()
            }
        };

        let port = serialport::new(name.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::Two)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()
            .map_err(|source| TransportError::Open {
                port: name.clone(),
                source,
            })?;
        info!(port = %name, baud_rate = config.baud_rate, "serial port opened");

        if config.settle_ms > 0 {
            thread::sleep(Duration::from_millis(config.settle_ms));
        }

        Ok(Self {
            name,
            port: Some(port),
        })
    }
}

impl Transport for SerialTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, packet: &[u8]) -> Result<(), TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;
        port.write_all(packet)?;
        port.flush()?;
        trace!(port = %self.name, bytes = packet.len(), "packet written");
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.port.take().is_some() {
            info!(port = %self.name, "serial port closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PortInfo, find_dmx_port};

    fn port(name: &str, kind: &'static str, description: Option<&str>) -> PortInfo {
        PortInfo {
            name: name.to_string(),
            kind,
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn usb_ports_are_candidates() {
        assert!(port("COM3", "usb", None).looks_like_dmx());
    }

    #[test]
    fn names_and_descriptions_are_matched_case_insensitively() {
        assert!(port("/dev/tty.usbmodem14201", "unknown", None).looks_like_dmx());
        assert!(port("/dev/ttyS0", "pci", Some("PCI Serial Adapter")).looks_like_dmx());
        assert!(!port("/dev/ttyS0", "pci", None).looks_like_dmx());
        assert!(!port("/dev/rfcomm0", "bluetooth", Some("headset")).looks_like_dmx());
    }

    #[test]
    fn discovery_picks_first_candidate() {
        let ports = vec![
            port("/dev/rfcomm0", "bluetooth", None),
            port("/dev/ttyUSB0", "unknown", None),
            port("/dev/ttyACM0", "usb", None),
        ];
        assert_eq!(find_dmx_port(&ports).unwrap().name, "/dev/ttyUSB0");
        assert!(find_dmx_port(&ports[..1]).is_none());
    }
}
