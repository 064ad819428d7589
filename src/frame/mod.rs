//! # Frame Encoding
//!
//! Turns a parsed [`DeviceModel`](crate::descriptor::DeviceModel) plus a
//! requested [`DeviceState`] into the [`PulseTrain`] a transmitter must
//! emit. Encoding is a pure function: the same model and state always
//! produce the same pulse train, and a model may serve any number of
//! concurrent encode calls.
//!
//! The pipeline is compose → checksum → modulate:
//!
//! ```text
//! DeviceState → frame bytes (field writes, checksums) → PulseTrain
//! ```

mod checksum;
mod compose;
mod pulses;
pub mod state;

pub use compose::encode;
pub use pulses::PulseTrain;
pub use state::{DeviceState, FanSpeed, Function, MAX_TEMP, MIN_TEMP, Mode, Power, SwingMode};
