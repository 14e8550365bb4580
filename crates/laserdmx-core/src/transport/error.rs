use thiserror::Error;

/// Errors returned by transports and port discovery.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no DMX serial port found")]
    NoPortFound,
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial port discovery failed: {0}")]
    Discovery(#[source] serialport::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport is closed")]
    Closed,
}
