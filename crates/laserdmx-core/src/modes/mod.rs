//! Mode encoder.
//!
//! Maps a feature's named mode (plus an optional explicit value) to the
//! `(channel, value)` pair the projector expects. The layering mirrors the
//! rest of the crate:
//! - `layout`: channel map and protocol constants (source of truth)
//! - `table`: sub-range type, `ModeTable` trait and the table macro
//! - `tables`: one closed enum per feature
//! - `encoder`: per-feature functions, including cross-channel rules
//! - `feature`: text-level dispatch for drivers
//! - `error`: explicit, actionable errors
//!
//! Encoders are pure: they read the state where a feature depends on a
//! companion channel but never write it. Applying the result is the
//! caller's job.

pub mod encoder;
pub mod error;
pub mod feature;
pub mod layout;
pub mod table;
pub mod tables;

pub use encoder::*;
pub use error::EncodeError;
pub use feature::{Feature, ModeInfo, ModeRequest, encode_request};
pub use table::{ModeRange, ModeTable};
pub use tables::*;
