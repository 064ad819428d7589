//! Full command-set export.
//!
//! Precomputes every reachable command of a device into one JSON
//! document: the capability lists plus a nested `commands` object keyed
//! mode → speed → (swing →) temperature, with a top-level `"off"`
//! command. Consumers can then transmit without carrying the codec at
//! all.
//!
//! A mode with no usable speed still gets commands at speed auto, and one
//! with no usable temperature at 26° — a banned-everything mode is still
//! switch-on-able with its fallback command.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde_json::{Map, Value, json};

use crate::descriptor::DeviceModel;
use crate::error::EncodeError;
use crate::frame::state::{DeviceState, FanSpeed};

/// Fallback temperature for modes whose whole range is banned.
const FALLBACK_TEMP: u8 = 26;

/// Render the device's complete command set as a JSON document.
pub fn device_to_json(model: &DeviceModel, manufacturer: &str) -> Result<Value, EncodeError> {
    let modes = model.supported_modes();
    let swing_modes = model.supported_swing();

    // Every mode encodes independently; fan out across them.
    let per_mode = modes
        .par_iter()
        .map(|&mode| {
            let speeds = {
                let speeds = model.supported_speeds(mode);
                if speeds.is_empty() { vec![FanSpeed::Auto] } else { speeds }
            };
            let temperatures = {
                let temperatures = model.supported_temperatures(mode);
                if temperatures.is_empty() { vec![FALLBACK_TEMP] } else { temperatures }
            };

            let mut speed_map = Map::new();
            for &speed in &speeds {
                let mut entry = Map::new();
                if swing_modes.is_empty() {
                    for &temperature in &temperatures {
                        let state = DeviceState::on(mode, speed, temperature);
                        let train = model.encode(&state)?;
                        entry.insert(temperature.to_string(), Value::from(train.into_inner()));
                    }
                } else {
                    for &swing in &swing_modes {
                        let mut temp_map = Map::new();
                        for &temperature in &temperatures {
                            let state = DeviceState::on(mode, speed, temperature).with_swing(swing);
                            let train = model.encode(&state)?;
                            temp_map.insert(temperature.to_string(), Value::from(train.into_inner()));
                        }
                        entry.insert(swing.to_string(), Value::Object(temp_map));
                    }
                }
                speed_map.insert(speed.to_string(), Value::Object(entry));
            }

            Ok((mode, Value::Object(speed_map), speeds, temperatures))
        })
        .collect::<Result<Vec<_>, EncodeError>>()?;

    let mut commands = Map::new();
    let mut fan_modes = BTreeSet::new();
    let mut temperatures = BTreeSet::new();
    for (mode, entry, speeds, temps) in per_mode {
        commands.insert(mode.to_string(), entry);
        fan_modes.extend(speeds);
        temperatures.extend(temps);
    }

    let off = model.encode(&DeviceState::off())?;
    commands.insert("off".to_owned(), Value::from(off.into_inner()));

    let min_temperature = temperatures.first().copied().unwrap_or(FALLBACK_TEMP);
    let max_temperature = temperatures.last().copied().unwrap_or(FALLBACK_TEMP);

    Ok(json!({
        "manufacturer": manufacturer,
        "precision": 1,
        "operationModes": modes.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "fanModes": fan_modes.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "swingModes": swing_modes.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "minTemperature": min_temperature,
        "maxTemperature": max_temperature,
        "commands": Value::Object(commands),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldPrograms, ModeBans, WriteOp};
    use crate::frame::state::Mode;

    fn set(index: usize, value: u8) -> Vec<WriteOp> {
        vec![WriteOp::ByteSet { index, value }]
    }

    fn model() -> DeviceModel {
        let mut model = DeviceModel::default();
        model.default_frame = vec![0x00, 0x00];
        model.timing.boot = vec![9000, 4500];
        model.timing.zero = vec![560, 560];
        model.timing.one = vec![560, 1690];
        model.timing.last_bit_implicit_one = true;
        model.power = FieldPrograms {
            type1: vec![set(0, 0x01), set(0, 0x02)],
            type2: Vec::new(),
        };
        // Only cool and heat carry ban records.
        model.bans = [
            Some(ModeBans::default()),
            Some(ModeBans::default()),
            None,
            None,
            None,
        ];
        model.mode = FieldPrograms {
            type1: vec![set(1, 0x10), set(1, 0x20)],
            type2: Vec::new(),
        };
        model
    }

    #[test]
    fn export_lists_capabilities_and_off() {
        let doc = device_to_json(&model(), "frostco").unwrap();

        assert_eq!(doc["manufacturer"], "frostco");
        assert_eq!(doc["operationModes"], json!(["cool", "heat"]));
        assert_eq!(doc["minTemperature"], 16);
        assert_eq!(doc["maxTemperature"], 30);
        assert!(doc["commands"]["off"].is_array());
        // No swing program: commands nest mode -> speed -> temperature.
        assert!(doc["commands"]["cool"]["auto"]["16"].is_array());
        assert_eq!(doc["swingModes"], json!([]));
    }

    #[test]
    fn export_is_deterministic() {
        let model = model();
        let a = device_to_json(&model, "x").unwrap();
        let b = device_to_json(&model, "x").unwrap();
        assert_eq!(a, b);
    }
}
