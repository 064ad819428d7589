//! # Transmission Backends
//!
//! The codec stops at the [`PulseTrain`]; getting it into the air is a
//! transport concern. Every sign convention, unit scaling and wire format
//! lives here, behind one object-safe trait.
//!
//! ## Available Senders
//!
//! - [`lirc`]: LIRC-style character device (raw tty, interleaved u32
//!   durations)
//! - [`http`]: HTTP bridge (signed-duration JSON payload)
//! - [`broadlink`]: Broadlink IR packet over UDP

use crate::error::EscarchaError;
use crate::frame::PulseTrain;

pub mod broadlink;
pub mod http;
pub mod lirc;

pub use broadlink::BroadlinkSender;
pub use http::HttpSender;
pub use lirc::LircSender;

/// A way to physically transmit a pulse train.
pub trait Sender {
    /// Transmit one pulse train.
    fn send(&mut self, pulses: &PulseTrain) -> Result<(), EscarchaError>;

    /// Whether the backing device or service looks reachable. Setup
    /// workflows call this before asking the user to watch for a
    /// reaction.
    fn probe_availability(&self) -> bool;
}
