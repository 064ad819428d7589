//! Frame composition.
//!
//! Encoding starts from a copy of the descriptor's default frame and
//! stamps the requested state into it in a fixed order: power, then (when
//! powered on) mode, speed, swing and temperature, then the explicit
//! function press, then the checksum programs. Later writes may overlap
//! earlier ones and the last write wins, so this order is not negotiable.
//!
//! A field whose function code is in the descriptor's solo set is never
//! written during normal composition — such devices only change that
//! field via the dedicated function press.

use crate::descriptor::{DeviceModel, WriteOp};
use crate::error::EncodeError;
use crate::frame::checksum::apply_checksums;
use crate::frame::pulses::{self, PulseTrain};
use crate::frame::state::{DeviceState, Function, MIN_TEMP, Power, SwingMode};

/// Encode a requested state into the pulse train to transmit.
pub fn encode(model: &DeviceModel, state: &DeviceState) -> Result<PulseTrain, EncodeError> {
    let frame = compose_frame(model, state)?;
    Ok(pulses::assemble(&frame, &model.timing))
}

impl DeviceModel {
    /// Encode a requested state into the pulse train to transmit.
    pub fn encode(&self, state: &DeviceState) -> Result<PulseTrain, EncodeError> {
        encode(self, state)
    }
}

/// Compose the command frame for a state, checksums included.
pub(crate) fn compose_frame(model: &DeviceModel, state: &DeviceState) -> Result<Vec<u8>, EncodeError> {
    let mut frame = model.default_frame.clone();
    let solo = &model.solo_functions;

    // A power program with no entry for this power state writes nothing.
    if let Some(ops) = model.power.entry(state.power as usize) {
        apply_ops(&mut frame, ops, false);
    }

    if state.power == Power::On {
        if !solo.contains(&Function::Mode.code()) && !model.mode.is_empty() {
            let ops = model
                .mode
                .entry(state.mode.index())
                .ok_or(EncodeError::UnsupportedField {
                    field: "mode",
                    value: state.mode.index() as u8,
                })?;
            apply_ops(&mut frame, ops, false);
        }

        if !solo.contains(&Function::WindSpeed.code()) && !model.speed.is_empty() {
            let ops = model
                .speed
                .entry(state.fan_speed.index())
                .ok_or(EncodeError::UnsupportedField {
                    field: "fan speed",
                    value: state.fan_speed.index() as u8,
                })?;
            apply_ops(&mut frame, ops, false);
        }

        if !solo.contains(&Function::WindSwing.code())
            && !solo.contains(&Function::WindFix.code())
            && !model.swing.is_empty()
        {
            let swing = state.swing.unwrap_or(SwingMode::On);
            let ops = model
                .swing
                .entry(swing.index())
                .ok_or(EncodeError::UnsupportedField {
                    field: "swing",
                    value: swing.index() as u8,
                })?;
            apply_ops(&mut frame, ops, false);
        }

        if !solo.contains(&Function::TemperatureUp.code())
            && !solo.contains(&Function::TemperatureDown.code())
        {
            if let Some(program) = model.temperature.selected() {
                let step = state
                    .temperature
                    .checked_sub(MIN_TEMP)
                    .map(usize::from)
                    .filter(|&step| step < program.steps.len())
                    .ok_or(EncodeError::UnsupportedField {
                        field: "temperature",
                        value: state.temperature,
                    })?;
                // Dynamic programs carry per-step deltas and add onto the
                // frame; static tables write absolutely.
                apply_ops(&mut frame, &program.steps[step], program.dynamic);
            }
        }
    }

    // An explicit function press layers on top of the composed state.
    if let Some(ops) = model.functions.entry(state.function.code()) {
        apply_ops(&mut frame, ops, false);
    }

    apply_checksums(&mut frame, &model.checksums);

    Ok(frame)
}

/// Apply a write program to the frame.
///
/// All operands were bounds-checked against the default frame at parse
/// time; arithmetic wraps modulo 256.
pub(crate) fn apply_ops(frame: &mut [u8], ops: &[WriteOp], additive: bool) {
    for op in ops {
        match *op {
            WriteOp::ByteSet { index, value } => {
                frame[index] = if additive {
                    frame[index].wrapping_add(value)
                } else {
                    value
                };
            }
            WriteOp::BitRange { start, end, value } => {
                apply_bit_range(frame, start, end, value, additive);
            }
        }
    }
}

/// Write `value` into frame bits `[start, end)`, MSB-first addressing.
///
/// A range confined to one byte replaces exactly its bits; a range
/// spanning a byte boundary splits the value across the low bits of the
/// first byte and the high bits of the second. Additive mode reads the
/// current range value first and adds before writing, so per-step deltas
/// compose regardless of prior contents.
fn apply_bit_range(frame: &mut [u8], start: usize, end: usize, value: u8, additive: bool) {
    let width = end - start;
    let hi_byte = start >> 3;
    let lo_byte = (end - 1) >> 3;
    let int_start = start - (hi_byte << 3);
    let int_end = end - (lo_byte << 3);

    if hi_byte == lo_byte {
        let keep = (((0xFFu32 << (8 - int_start)) | (0xFFu32 >> int_end)) & 0xFF) as u8;
        let origin = frame[lo_byte];
        let bits = if additive {
            let shift = 8 - int_end;
            let current = (origin & !keep) >> shift;
            current.wrapping_add(value) << shift & !keep
        } else {
            value << (8 - int_start - width) & !keep
        };
        frame[lo_byte] = (origin & keep) | bits;
    } else {
        let origin_hi = frame[hi_byte];
        let origin_lo = frame[lo_byte];
        let keep_hi = ((0xFFu32 << (8 - int_start)) & 0xFF) as u8;
        let keep_lo = (0xFFu32 >> int_end) as u8;
        let current =
            (((origin_hi & !keep_hi) as u32) << int_end) | (((origin_lo & !keep_lo) as u32) >> (8 - int_end));
        let raw = if additive {
            current.wrapping_add(value as u32)
        } else {
            value as u32
        };
        let masked = (0xFFu32 >> (8 - width)) & raw;
        frame[hi_byte] = (origin_hi & keep_hi) | (masked >> int_end) as u8;
        frame[lo_byte] = (origin_lo & keep_lo) | ((masked << (8 - int_end)) & 0xFF) as u8;
    }
}
