use thiserror::Error;

/// Errors returned when reading a framed packet back.
///
/// # Examples
/// ```
/// use laserdmx_core::PacketError;
///
/// let err = PacketError::InvalidStartCode { value: 0xcc };
/// assert!(err.to_string().contains("invalid start code"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("packet too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("packet too long: {slots} slots exceed {max}")]
    TooLong { slots: usize, max: usize },
    #[error("invalid start code: {value:#04x}")]
    InvalidStartCode { value: u8 },
}
