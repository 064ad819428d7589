//! # Device Descriptors
//!
//! A device descriptor ("device code") is a compact binary file describing
//! one air-conditioner model's infrared protocol: the baseline command
//! frame, the write programs that stamp power/mode/speed/swing/temperature
//! into it, the checksum programs that seal it, and the pulse timings that
//! modulate it onto the carrier.
//!
//! [`parse`] is a pure function from bytes to [`DeviceModel`]; the model
//! is immutable and shared read-only by any number of encode calls. The
//! capability queries (`supported_modes` and friends on [`DeviceModel`])
//! are the surface configuration UIs build their choice lists from.

mod capability;
mod model;
mod parse;
mod spans;
mod tags;

pub use model::{
    Ban, BitOrder, ChecksumKind, ChecksumSpec, DelayPos, DeviceModel, FieldPrograms,
    FunctionPrograms, ModeBans, TempProgram, TempPrograms, Timing, WriteOp,
};
pub use parse::{TEMP_STEPS, parse};
pub use spans::resolve_spans;
pub use tags::{TAG_ORDER, Tag};

impl DeviceModel {
    /// Parse a raw descriptor buffer. Convenience for [`parse`].
    pub fn parse(data: &[u8]) -> Result<Self, crate::error::ParseError> {
        parse(data)
    }
}
