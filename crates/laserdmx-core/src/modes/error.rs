use thiserror::Error;

use crate::channels::ChannelError;

/// Errors returned by the mode encoder.
///
/// # Examples
/// ```
/// use laserdmx_core::EncodeError;
///
/// let err = EncodeError::UnknownMode {
///     feature: "pattern_zoom",
///     mode: "sideways".to_string(),
/// };
/// assert!(err.to_string().contains("unknown mode"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unknown mode '{mode}' for {feature}")]
    UnknownMode { feature: &'static str, mode: String },
    #[error("unknown feature '{name}'")]
    UnknownFeature { name: String },
    #[error("value {value} out of range for {feature} {mode} (valid {lo}..={hi})")]
    ValueOutOfRange {
        feature: &'static str,
        mode: &'static str,
        value: u16,
        lo: u8,
        hi: u8,
    },
    #[error("{feature} {mode} requires a {what}")]
    MissingRequiredValue {
        feature: &'static str,
        mode: &'static str,
        what: &'static str,
    },
    #[error("{feature} requires channel {channel} to be set first")]
    PreconditionNotMet { feature: &'static str, channel: u16 },
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
