//! Channel state store.
//!
//! Holds the current byte of every DMX channel of the projector. This is the
//! single mutable ground truth: encoders read companion channels from it and
//! packets are framed from its snapshot. It carries no feature knowledge.
//!
//! Channels are 1-indexed on the API (as in device documentation) and stored
//! 0-indexed. A failed write never touches the array.

pub mod error;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ChannelError;

/// Channel count used when nothing else is configured.
pub const DEFAULT_CHANNEL_COUNT: usize = 32;
/// Upper bound of a single DMX universe.
pub const MAX_CHANNELS: usize = 512;

/// Immutable copy of the channel values, index 0 = channel 1.
///
/// # Examples
/// ```
/// use laserdmx_core::ChannelState;
///
/// let state = ChannelState::default();
/// let snapshot = state.snapshot();
/// assert_eq!(snapshot.len(), 32);
/// assert!(snapshot.as_bytes().iter().all(|v| *v == 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelArray(Vec<u8>);

impl ChannelArray {
    pub(crate) fn from_vec(values: Vec<u8>) -> Self {
        Self(values)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of a 1-indexed channel, if present.
    pub fn get(&self, channel: u16) -> Option<u8> {
        let index = usize::from(channel).checked_sub(1)?;
        self.0.get(index).copied()
    }
}

/// A resolved `(channel, value)` pair produced by the mode encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelWrite {
    pub channel: u16,
    pub value: u8,
}

impl ChannelWrite {
    pub const fn new(channel: u16, value: u8) -> Self {
        Self { channel, value }
    }
}

/// Mutable channel array for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState {
    values: Vec<u8>,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            values: vec![0; DEFAULT_CHANNEL_COUNT],
        }
    }
}

impl ChannelState {
    /// Create an all-zero array of `count` channels.
    ///
    /// # Errors
    /// Returns `ChannelError::InvalidChannelCount` unless `count` is in
    /// `1..=512`.
    pub fn new(count: usize) -> Result<Self, ChannelError> {
        if count == 0 || count > MAX_CHANNELS {
            return Err(ChannelError::InvalidChannelCount { count });
        }
        Ok(Self {
            values: vec![0; count],
        })
    }

    /// Resume from a snapshot, e.g. one decoded with `parse_packet`.
    ///
    /// # Errors
    /// Returns `ChannelError::InvalidChannelCount` unless the snapshot holds
    /// `1..=512` channels.
    pub fn from_snapshot(snapshot: ChannelArray) -> Result<Self, ChannelError> {
        let count = snapshot.len();
        if count == 0 || count > MAX_CHANNELS {
            return Err(ChannelError::InvalidChannelCount { count });
        }
        Ok(Self { values: snapshot.0 })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write `value` to a 1-indexed channel.
    ///
    /// # Examples
    /// ```
    /// use laserdmx_core::{ChannelError, ChannelState};
    ///
    /// let mut state = ChannelState::default();
    /// state.set_channel(5, 145)?;
    /// assert_eq!(state.get_channel(5)?, 145);
    /// assert!(state.set_channel(5, 256).is_err());
    /// assert_eq!(state.get_channel(5)?, 145);
    /// # Ok::<(), ChannelError>(())
    /// ```
    ///
    /// # Errors
    /// Returns `ChannelError::OutOfRange` when the channel is outside
    /// `1..=len` or the value does not fit in a byte.
    pub fn set_channel(&mut self, channel: u16, value: u16) -> Result<(), ChannelError> {
        let index = self.index_of(channel, Some(value))?;
        let byte = u8::try_from(value).map_err(|_| self.out_of_range(channel, Some(value)))?;
        self.values[index] = byte;
        debug!(channel, value = byte, "channel set");
        Ok(())
    }

    /// Read a 1-indexed channel.
    ///
    /// # Errors
    /// Returns `ChannelError::OutOfRange` when the channel is outside
    /// `1..=len`.
    pub fn get_channel(&self, channel: u16) -> Result<u8, ChannelError> {
        let index = self.index_of(channel, None)?;
        Ok(self.values[index])
    }

    /// Apply an encoder result.
    pub fn apply(&mut self, write: ChannelWrite) -> Result<(), ChannelError> {
        self.set_channel(write.channel, u16::from(write.value))
    }

    pub fn reset_all(&mut self) {
        self.values.iter_mut().for_each(|value| *value = 0);
        debug!(channels = self.values.len(), "all channels reset");
    }

    pub fn snapshot(&self) -> ChannelArray {
        ChannelArray::from_vec(self.values.clone())
    }

    fn index_of(&self, channel: u16, value: Option<u16>) -> Result<usize, ChannelError> {
        let index = usize::from(channel)
            .checked_sub(1)
            .filter(|index| *index < self.values.len());
        index.ok_or_else(|| self.out_of_range(channel, value))
    }

    fn out_of_range(&self, channel: u16, value: Option<u16>) -> ChannelError {
        ChannelError::OutOfRange {
            channel,
            value,
            channels: self.values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_channel_round_trips_every_value() {
        let mut state = ChannelState::default();
        for channel in 1..=DEFAULT_CHANNEL_COUNT as u16 {
            for value in [0u16, 1, 127, 128, 254, 255] {
                state.set_channel(channel, value).unwrap();
                assert_eq!(state.get_channel(channel).unwrap(), value as u8);
            }
        }
    }

    #[test]
    fn rejects_channel_zero_and_past_end_without_mutation() {
        let mut state = ChannelState::default();
        state.set_channel(1, 10).unwrap();
        let before = state.snapshot();

        let err = state.set_channel(0, 5).unwrap_err();
        assert!(matches!(err, ChannelError::OutOfRange { channel: 0, .. }));
        let err = state.set_channel(33, 5).unwrap_err();
        assert!(matches!(err, ChannelError::OutOfRange { channel: 33, .. }));

        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn rejects_value_wider_than_a_byte() {
        let mut state = ChannelState::default();
        let err = state.set_channel(4, 256).unwrap_err();
        assert_eq!(
            err,
            ChannelError::OutOfRange {
                channel: 4,
                value: Some(256),
                channels: 32,
            }
        );
        assert_eq!(state.get_channel(4).unwrap(), 0);
    }

    #[test]
    fn get_channel_rejects_invalid_index() {
        let state = ChannelState::default();
        assert!(state.get_channel(0).is_err());
        assert!(state.get_channel(33).is_err());
    }

    #[test]
    fn reset_all_zeroes_every_channel() {
        let mut state = ChannelState::default();
        state.set_channel(1, 200).unwrap();
        state.set_channel(32, 9).unwrap();
        state.reset_all();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.len(), 32);
        assert!(snapshot.as_bytes().iter().all(|v| *v == 0));
    }

    #[test]
    fn snapshot_is_detached_from_state() {
        let mut state = ChannelState::default();
        let snapshot = state.snapshot();
        state.set_channel(2, 50).unwrap();
        assert_eq!(snapshot.get(2), Some(0));
        assert_eq!(state.snapshot().get(2), Some(50));
    }

    #[test]
    fn channel_count_is_bounded_by_universe() {
        assert!(ChannelState::new(0).is_err());
        assert!(ChannelState::new(513).is_err());
        assert_eq!(ChannelState::new(512).unwrap().len(), 512);
    }

    #[test]
    fn apply_writes_encoder_result() {
        let mut state = ChannelState::default();
        state.apply(ChannelWrite::new(22, 145)).unwrap();
        assert_eq!(state.get_channel(22).unwrap(), 145);
        assert!(state.apply(ChannelWrite::new(40, 1)).is_err());
    }

    #[test]
    fn from_snapshot_resumes_values_and_length() {
        let mut state = ChannelState::new(16).unwrap();
        state.set_channel(1, 100).unwrap();
        state.set_channel(16, 7).unwrap();
        let resumed = ChannelState::from_snapshot(state.snapshot()).unwrap();
        assert_eq!(resumed, state);

        let err = ChannelState::from_snapshot(ChannelArray::from_vec(Vec::new())).unwrap_err();
        assert_eq!(err, ChannelError::InvalidChannelCount { count: 0 });
        assert!(ChannelState::from_snapshot(ChannelArray::from_vec(vec![0; 513])).is_err());
    }
}
