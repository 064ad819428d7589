//! LIRC-style character-device sender.
//!
//! Generic IR blasters that show up as a character device (`/dev/lirc0`,
//! USB tty adapters) take the pulse train as interleaved little-endian
//! u32 mark/space durations. The device node is opened per send and
//! configured raw so nothing between us and the hardware rewrites bytes
//! (0x0A and 0x0D are perfectly ordinary duration bytes).
//!
//! Large trains are written in chunks with a small pause so slow adapters
//! don't drop data.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::EscarchaError;
use crate::frame::PulseTrain;
use crate::transport::Sender;

/// Default device node.
pub const DEFAULT_DEVICE: &str = "/dev/lirc0";

/// Default chunk size for writes (bytes).
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds).
const CHUNK_DELAY_MS: u64 = 2;

/// Sends pulse trains to an IR blaster character device.
pub struct LircSender {
    path: PathBuf,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl LircSender {
    pub fn new<P: AsRef<Path>>(device: P) -> Self {
        Self {
            path: device.as_ref().to_owned(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    /// Set the chunk size for large writes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size;
    }

    /// Serialize a pulse train to the device wire format.
    fn wire_bytes(pulses: &PulseTrain) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(pulses.len() * 4);
        for &duration in pulses.durations() {
            bytes.extend_from_slice(&duration.to_le_bytes());
        }
        bytes
    }
}

impl Sender for LircSender {
    fn send(&mut self, pulses: &PulseTrain) -> Result<(), EscarchaError> {
        let mut file = OpenOptions::new().write(true).open(&self.path).map_err(|e| {
            EscarchaError::Transport(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            configure_tty_raw(file.as_raw_fd())?;
        }

        let bytes = Self::wire_bytes(pulses);
        log::debug!(
            "sending {} durations ({} bytes) to {}",
            pulses.len(),
            bytes.len(),
            self.path.display()
        );

        for chunk in bytes.chunks(self.chunk_size) {
            file.write_all(chunk)
                .map_err(|e| EscarchaError::Transport(format!("write failed: {}", e)))?;
            if bytes.len() > self.chunk_size && !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }

        file.flush()
            .map_err(|e| EscarchaError::Transport(format!("flush failed: {}", e)))
    }

    fn probe_availability(&self) -> bool {
        self.path.exists()
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// Not every blaster node is a tty; when it isn't, `tcgetattr` fails with
/// ENOTTY and the device takes raw bytes anyway, so that failure is not
/// an error.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), EscarchaError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        let errno = io::Error::last_os_error();
        if errno.raw_os_error() == Some(libc::ENOTTY) {
            return Ok(());
        }
        return Err(EscarchaError::Transport(format!("tcgetattr failed: {}", errno)));
    }
    let mut termios = unsafe { termios.assume_init() };

    // No input processing, no flow control: 0x11/0x13 are valid duration
    // bytes and must pass through.
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    // No output post-processing.
    termios.c_oflag &= !libc::OPOST;

    // No echo, no canonical mode, no signals.
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    // 8-bit characters, no parity.
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(EscarchaError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}
