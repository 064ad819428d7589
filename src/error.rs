//! # Error Types
//!
//! This module defines error types used throughout the escarcha library.
//!
//! Parsing is all-or-nothing: a descriptor that fails to parse yields no
//! partial model, and the device must be treated as unusable. Encoding
//! never fails for states inside the capability surface; checksum and
//! bit-field arithmetic wraps modulo 256 rather than erroring.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::Tag;

/// Errors produced while parsing a binary device descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The buffer is shorter than its own header implies.
    #[error("descriptor truncated: buffer shorter than the tag table implies")]
    Truncated,

    /// The descriptor declares a tag count this layout does not know.
    #[error("descriptor declares {tag_count} tags, expected 29")]
    UnsupportedLayout { tag_count: u8 },

    /// A segment could not be decoded: bad hex, bad token, an offset or
    /// length inconsistency, or an operand outside the default frame.
    #[error("malformed descriptor segment for tag {0:?}")]
    Malformed(Tag),
}

/// Errors produced while encoding a device state into a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The requested state names a value the descriptor has no entry for.
    /// Callers that validate against the capability queries first never
    /// see this.
    #[error("unsupported {field} value {value} for this device")]
    UnsupportedField { field: &'static str, value: u8 },
}

/// Errors produced while loading the device index catalog.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index file does not exist.
    #[error("device index not found: {0}")]
    NotFound(PathBuf),

    /// The index file is not valid JSON for the expected shape.
    #[error("device index is invalid: {0}")]
    Invalid(#[from] serde_json::Error),

    /// The index parsed but lists no brands.
    #[error("device index is empty")]
    Empty,

    /// A brand lookup failed.
    #[error("unknown brand: {0}")]
    UnknownBrand(String),

    /// I/O failure while reading the index file.
    #[error("failed to read device index: {0}")]
    Io(#[from] io::Error),
}

/// Main error type for escarcha operations.
#[derive(Debug, Error)]
pub enum EscarchaError {
    /// Descriptor parsing failure.
    #[error("descriptor error: {0}")]
    Parse(#[from] ParseError),

    /// Frame encoding failure.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Device index failure.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Transport-level errors (device access, connection, protocol).
    #[error("transport error: {0}")]
    Transport(String),

    /// A caller-supplied value that never reaches the codec (CLI flags,
    /// output serialization).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
