//! Device-state vocabulary.
//!
//! The ordinals here are part of the descriptor format: write programs are
//! indexed by them and ban lists name them. They are not arbitrary.

use std::fmt;

/// Power state. On is ordinal 0 in power write programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    On = 0,
    Off = 1,
}

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mode {
    Cool = 0,
    Heat = 1,
    Auto = 2,
    Fan = 3,
    Dry = 4,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Cool, Mode::Heat, Mode::Auto, Mode::Fan, Mode::Dry];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Cool => "cool",
            Mode::Heat => "heat",
            Mode::Auto => "auto",
            Mode::Fan => "fan",
            Mode::Dry => "dry",
        };
        f.write_str(name)
    }
}

/// Fan speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FanSpeed {
    Auto = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [FanSpeed::Auto, FanSpeed::Low, FanSpeed::Medium, FanSpeed::High];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FanSpeed::Auto => "auto",
            FanSpeed::Low => "low",
            FanSpeed::Medium => "medium",
            FanSpeed::High => "high",
        };
        f.write_str(name)
    }
}

/// Swing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingMode {
    On = 0,
    Off = 1,
}

impl SwingMode {
    pub const ALL: [SwingMode; 2] = [SwingMode::On, SwingMode::Off];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SwingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwingMode::On => "on",
            SwingMode::Off => "off",
        })
    }
}

/// Control actions a remote button maps to.
///
/// `Power` (the default) composes the full state normally; the others are
/// dedicated button presses layered onto the composed frame — and any
/// function listed in the descriptor's solo set suppresses its field
/// during normal composition entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Function {
    Power = 1,
    Mode = 2,
    TemperatureUp = 3,
    TemperatureDown = 4,
    WindSpeed = 5,
    WindSwing = 6,
    WindFix = 7,
}

impl Function {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Function::Power,
            2 => Function::Mode,
            3 => Function::TemperatureUp,
            4 => Function::TemperatureDown,
            5 => Function::WindSpeed,
            6 => Function::WindSwing,
            7 => Function::WindFix,
            _ => return None,
        })
    }
}

impl std::str::FromStr for Power {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Power::On),
            "off" => Ok(Power::Off),
            _ => Err(format!("unknown power state '{}' (expected on or off)", s)),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cool" => Ok(Mode::Cool),
            "heat" => Ok(Mode::Heat),
            "auto" => Ok(Mode::Auto),
            "fan" => Ok(Mode::Fan),
            "dry" => Ok(Mode::Dry),
            _ => Err(format!(
                "unknown mode '{}' (expected cool, heat, auto, fan or dry)",
                s
            )),
        }
    }
}

impl std::str::FromStr for FanSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(FanSpeed::Auto),
            "low" => Ok(FanSpeed::Low),
            "medium" => Ok(FanSpeed::Medium),
            "high" => Ok(FanSpeed::High),
            _ => Err(format!(
                "unknown fan speed '{}' (expected auto, low, medium or high)",
                s
            )),
        }
    }
}

impl std::str::FromStr for SwingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(SwingMode::On),
            "off" => Ok(SwingMode::Off),
            _ => Err(format!("unknown swing position '{}' (expected on or off)", s)),
        }
    }
}

/// Lowest addressable temperature, in degrees.
pub const MIN_TEMP: u8 = 16;

/// Highest addressable temperature, in degrees.
pub const MAX_TEMP: u8 = 30;

/// A requested device state, constructed fresh per encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    pub power: Power,
    pub mode: Mode,
    pub fan_speed: FanSpeed,
    /// Absolute degrees, 16–30.
    pub temperature: u8,
    /// `None` lets the encoder fall back to swing-on, mirroring remotes
    /// that have no swing toggle.
    pub swing: Option<SwingMode>,
    /// The function press to layer on; `Power` is the plain composed
    /// command.
    pub function: Function,
}

impl DeviceState {
    /// A powered-on state at the given mode, speed and temperature.
    pub fn on(mode: Mode, fan_speed: FanSpeed, temperature: u8) -> Self {
        Self {
            power: Power::On,
            mode,
            fan_speed,
            temperature,
            swing: None,
            function: Function::Power,
        }
    }

    /// The power-off command at a neutral fallback state.
    pub fn off() -> Self {
        Self {
            power: Power::Off,
            mode: Mode::Auto,
            fan_speed: FanSpeed::Auto,
            temperature: 26,
            swing: None,
            function: Function::Power,
        }
    }

    pub fn with_swing(mut self, swing: SwingMode) -> Self {
        self.swing = Some(swing);
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.function = function;
        self
    }
}
