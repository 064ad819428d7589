//! Capability queries.
//!
//! Read-only views over [`DeviceModel`] used to build user-facing choice
//! lists (and to validate requested states before encoding). A value is
//! reported only when the descriptor can actually express it: the mode
//! must carry a ban record at all, and every write-program variant that
//! exists must have a non-empty entry for the value.
//!
//! Bans shape these lists but do not make encoding fail — a caller may
//! still encode a banned fallback, as the command-set export does.

use crate::descriptor::model::DeviceModel;
use crate::descriptor::parse::TEMP_STEPS;
use crate::frame::state::{FanSpeed, MIN_TEMP, Mode, SwingMode};

impl DeviceModel {
    /// The operating modes this device supports.
    pub fn supported_modes(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|&mode| self.bans[mode.index()].is_some() && self.mode.supports(mode.index()))
            .collect()
    }

    /// The fan speeds available in `mode`. Empty for an unsupported mode.
    pub fn supported_speeds(&self, mode: Mode) -> Vec<FanSpeed> {
        let Some(bans) = &self.bans[mode.index()] else {
            return Vec::new();
        };
        FanSpeed::ALL
            .into_iter()
            .filter(|&speed| {
                !bans.speeds.bans(speed.index() as u8) && self.speed.supports(speed.index())
            })
            .collect()
    }

    /// The target temperatures (absolute degrees) available in `mode`.
    /// Empty for an unsupported mode.
    pub fn supported_temperatures(&self, mode: Mode) -> Vec<u8> {
        let Some(bans) = &self.bans[mode.index()] else {
            return Vec::new();
        };
        (0..TEMP_STEPS as u8)
            .filter(|&step| {
                !bans.temperatures.bans(step) && self.temperature.supports(step as usize)
            })
            .map(|step| step + MIN_TEMP)
            .collect()
    }

    /// The swing positions this device supports, if any.
    ///
    /// The raw swing-info token values `"0"` and `"1"` mark devices with
    /// no selectable swing (none at all, or a dedicated solo button); for
    /// anything else, a present swing write program enables both
    /// positions.
    pub fn supported_swing(&self) -> Vec<SwingMode> {
        if self.swing_info != "0" && self.swing_info != "1" && !self.swing.is_empty() {
            SwingMode::ALL.to_vec()
        } else {
            Vec::new()
        }
    }
}
