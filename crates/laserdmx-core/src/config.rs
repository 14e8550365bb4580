//! Session settings.
//!
//! Every field has a default so a partial (or empty) configuration file is
//! valid. Drivers load it from TOML and apply their own overrides on top.

use serde::{Deserialize, Serialize};

use crate::channels::DEFAULT_CHANNEL_COUNT;

/// DMX512 line rate.
pub const DEFAULT_BAUD_RATE: u32 = 250_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;
/// Pause after opening the port before the interface accepts data.
pub const DEFAULT_SETTLE_MS: u64 = 2_000;

/// Settings of one session.
///
/// # Examples
/// ```
/// use laserdmx_core::SessionConfig;
///
/// let config = SessionConfig::default();
/// assert_eq!(config.channels, 32);
/// assert_eq!(config.serial.baud_rate, 250_000);
/// assert!(config.serial.port.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of addressable channels (1..=512).
    pub channels: usize,
    pub serial: SerialConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNEL_COUNT,
            serial: SerialConfig::default(),
        }
    }
}

/// Serial link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    /// Port name; auto-detected when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub baud_rate: u32,
    pub timeout_ms: u64,
    pub settle_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}
