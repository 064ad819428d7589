//! Broadlink packet sender.
//!
//! Broadlink RM blasters take an IR command as a `0x26` packet of
//! tick-scaled durations. The unit conversion (microsecond-ish timing
//! units to 32.84 kHz ticks, the ×269/8192 folklore constant), the
//! variable-width duration encoding and the 16-byte alignment padding all
//! belong to this wire format, not to the codec.
//!
//! The finished packet goes out as a single UDP datagram to the bridge or
//! relay configured as the target.

use std::net::{SocketAddr, UdpSocket};

use crate::error::EscarchaError;
use crate::frame::PulseTrain;
use crate::transport::Sender;

/// Sends pulse trains as Broadlink IR packets over UDP.
pub struct BroadlinkSender {
    addr: SocketAddr,
}

impl BroadlinkSender {
    pub fn new(target: &str) -> Result<Self, EscarchaError> {
        let addr = target
            .parse::<SocketAddr>()
            .map_err(|e| EscarchaError::Transport(format!("bad target address {}: {}", target, e)))?;
        Ok(Self { addr })
    }
}

/// Build the Broadlink IR packet for a pulse train.
///
/// Layout: `0x26 0x00`, little-endian u16 payload length, the payload
/// (each duration as one byte, or `0x00` + big-endian u16 when it exceeds
/// 255 ticks), the `0x0d 0x05` trailer, then zero padding so the packet
/// length plus four is a multiple of 16 (the devices encrypt in AES
/// blocks).
pub fn packet(pulses: &PulseTrain) -> Vec<u8> {
    let mut payload = Vec::new();
    for &duration in pulses.durations() {
        let ticks = (u64::from(duration) * 269 / 8192).min(0xFFFF) as u16;
        if ticks < 256 {
            payload.push(ticks as u8);
        } else {
            payload.push(0x00);
            payload.extend_from_slice(&ticks.to_be_bytes());
        }
    }

    let mut packet = vec![0x26, 0x00];
    packet.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    packet.extend_from_slice(&payload);
    packet.extend_from_slice(&[0x0d, 0x05]);

    let remainder = (packet.len() + 4) % 16;
    if remainder != 0 {
        packet.resize(packet.len() + 16 - remainder, 0x00);
    }
    packet
}

impl Sender for BroadlinkSender {
    fn send(&mut self, pulses: &PulseTrain) -> Result<(), EscarchaError> {
        let packet = packet(pulses);
        log::debug!("sending {}-byte broadlink packet to {}", packet.len(), self.addr);

        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| EscarchaError::Transport(format!("failed to bind UDP socket: {}", e)))?;
        let sent = socket
            .send_to(&packet, self.addr)
            .map_err(|e| EscarchaError::Transport(format!("send to {} failed: {}", self.addr, e)))?;
        if sent != packet.len() {
            return Err(EscarchaError::Transport(format!(
                "short datagram: sent {} of {} bytes",
                sent,
                packet.len()
            )));
        }
        Ok(())
    }

    fn probe_availability(&self) -> bool {
        UdpSocket::bind("0.0.0.0:0").is_ok()
    }
}
