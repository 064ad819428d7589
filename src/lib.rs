//! # Escarcha - Infrared AC Remote Codec
//!
//! Escarcha reproduces factory air-conditioner remotes from compact
//! binary device descriptors. It provides:
//!
//! - **Descriptor parsing**: tagged device codes into a typed
//!   [`DeviceModel`]
//! - **Capability queries**: which modes, speeds, temperatures and swing
//!   positions a device actually supports
//! - **Frame encoding**: a requested state into the exact byte frame and
//!   [`PulseTrain`] to transmit
//! - **Catalog**: the brand/device JSON index and full command-set export
//! - **Transport**: LIRC device, HTTP bridge and Broadlink senders
//!
//! ## Quick Start
//!
//! ```no_run
//! use escarcha::{DeviceModel, DeviceState, FanSpeed, Mode};
//! use escarcha::transport::{LircSender, Sender};
//!
//! let bytes = std::fs::read("frostco_fc2000.bin")?;
//! let model = DeviceModel::parse(&bytes)?;
//!
//! // What can this device do?
//! println!("modes: {:?}", model.supported_modes());
//!
//! // Cool at 24°, medium fan.
//! let state = DeviceState::on(Mode::Cool, FanSpeed::Medium, 24);
//! let train = model.encode(&state)?;
//!
//! // Hand it to a transmitter.
//! let mut sender = LircSender::new("/dev/lirc0");
//! sender.send(&train)?;
//! # Ok::<(), escarcha::EscarchaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`descriptor`] | Descriptor parsing and capability queries |
//! | [`frame`] | State composition, checksums, pulse assembly |
//! | [`catalog`] | Device index and command-set export |
//! | [`transport`] | Transmission backends |
//! | [`error`] | Error types |
//!
//! Parsing and encoding are pure and synchronous; a parsed model is
//! immutable and may serve concurrent encode calls.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod frame;
pub mod transport;

// Re-exports for convenience
pub use descriptor::DeviceModel;
pub use error::{EncodeError, EscarchaError, IndexError, ParseError};
pub use frame::{DeviceState, FanSpeed, Function, Mode, Power, PulseTrain, SwingMode};
