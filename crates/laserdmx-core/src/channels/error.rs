use thiserror::Error;

/// Errors returned by the channel state store.
///
/// # Examples
/// ```
/// use laserdmx_core::ChannelError;
///
/// let err = ChannelError::OutOfRange { channel: 33, value: None, channels: 32 };
/// assert!(err.to_string().contains("channel 33"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("out of range: channel {channel} (valid 1..={channels}){}", describe_value(.value))]
    OutOfRange {
        channel: u16,
        value: Option<u16>,
        channels: usize,
    },
    #[error("invalid channel count: {count} (valid 1..=512)")]
    InvalidChannelCount { count: usize },
}

fn describe_value(value: &Option<u16>) -> String {
    match value {
        Some(value) => format!(", value {value} (valid 0..=255)"),
        None => String::new(),
    }
}
