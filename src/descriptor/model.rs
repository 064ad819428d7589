//! The parsed device model.
//!
//! [`DeviceModel`] is the immutable output of the descriptor parser: the
//! baseline command frame, the write programs that stamp each field into
//! it, the checksum programs, and the pulse timing constants. It is built
//! once per descriptor and is safe to share read-only across threads.

use std::collections::{BTreeMap, BTreeSet};

/// A single instruction of a field write program.
///
/// Type-1 programs set whole bytes; type-2 programs write a value into an
/// arbitrary bit range of the frame, addressed as one contiguous MSB-first
/// bitstream (a range may straddle a byte boundary). Dynamic temperature
/// programs reuse both shapes with additive semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Set (or, additively, bump) the byte at `index`.
    ByteSet { index: usize, value: u8 },
    /// Write `value` into frame bits `[start, end)`.
    BitRange { start: usize, end: usize, value: u8 },
}

/// The two write-program encodings a field can carry.
///
/// A descriptor may define either, both, or neither variant for a field;
/// the encoder prefers type 1 when it is non-empty, matching the
/// descriptor convention. Entries are indexed by the field's ordinal
/// (mode, speed, swing position, power state).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPrograms {
    pub type1: Vec<Vec<WriteOp>>,
    pub type2: Vec<Vec<WriteOp>>,
}

impl FieldPrograms {
    /// Whether neither variant defines any entry.
    pub fn is_empty(&self) -> bool {
        self.type1.is_empty() && self.type2.is_empty()
    }

    /// The write entry the encoder would apply for `ordinal`, or `None`
    /// when the preferred variant has no such entry.
    pub fn entry(&self, ordinal: usize) -> Option<&[WriteOp]> {
        if !self.type1.is_empty() {
            self.type1.get(ordinal).map(Vec::as_slice)
        } else if !self.type2.is_empty() {
            self.type2.get(ordinal).map(Vec::as_slice)
        } else {
            None
        }
    }

    /// Whether `ordinal` has a usable entry in every variant that exists.
    ///
    /// The capability queries treat a field value as supported only when
    /// no defined variant leaves it without operations.
    pub fn supports(&self, ordinal: usize) -> bool {
        let type1_ok = self.type1.is_empty()
            || self.type1.get(ordinal).is_some_and(|ops| !ops.is_empty());
        let type2_ok = self.type2.is_empty()
            || self.type2.get(ordinal).is_some_and(|ops| !ops.is_empty());
        type1_ok && type2_ok
    }
}

/// One variant of a temperature program.
///
/// `steps` is indexed by the 0-based temperature step. A static program is
/// the descriptor's own per-step table and writes absolutely; a dynamic
/// program was expanded at parse time from a per-step-delta template and
/// applies additively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempProgram {
    pub steps: Vec<Vec<WriteOp>>,
    pub dynamic: bool,
}

impl TempProgram {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Temperature programs per encoding variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempPrograms {
    pub type1: TempProgram,
    pub type2: TempProgram,
}

impl TempPrograms {
    /// The program the encoder would apply, preferring type 1.
    pub fn selected(&self) -> Option<&TempProgram> {
        if !self.type1.is_empty() {
            Some(&self.type1)
        } else if !self.type2.is_empty() {
            Some(&self.type2)
        } else {
            None
        }
    }

    /// Whether `step` has a usable entry in every variant that exists.
    pub fn supports(&self, step: usize) -> bool {
        let type1_ok = self.type1.is_empty()
            || self.type1.steps.get(step).is_some_and(|ops| !ops.is_empty());
        let type2_ok = self.type2.is_empty()
            || self.type2.steps.get(step).is_some_and(|ops| !ops.is_empty());
        type1_ok && type2_ok
    }
}

/// Function-press write programs, keyed by function code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionPrograms {
    pub type1: BTreeMap<u8, Vec<WriteOp>>,
    pub type2: BTreeMap<u8, Vec<WriteOp>>,
}

impl FunctionPrograms {
    /// The write entry for `code`, type 1 preferred.
    pub fn entry(&self, code: u8) -> Option<&[WriteOp]> {
        self.type1
            .get(&code)
            .or_else(|| self.type2.get(&code))
            .map(Vec::as_slice)
    }
}

/// A per-field ban inside one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ban {
    /// Nothing banned.
    None,
    /// Every value banned.
    All,
    /// Exactly the listed ordinals banned.
    Listed(Vec<u8>),
}

impl Ban {
    /// Whether `value` is banned.
    pub fn bans(&self, value: u8) -> bool {
        match self {
            Ban::None => false,
            Ban::All => true,
            Ban::Listed(values) => values.contains(&value),
        }
    }
}

impl Default for Ban {
    fn default() -> Self {
        Ban::None
    }
}

/// Speed and temperature bans for one operating mode.
///
/// A mode with no ban record at all (the descriptor's `NA` token) is
/// represented as `None` at the [`DeviceModel`] level and reported as
/// unsupported; an empty ban record (the `""` token) is a present record
/// with everything banned. The two are deliberately distinct states.
/// Temperature entries are 0-based steps, not absolute degrees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeBans {
    pub speeds: Ban,
    pub temperatures: Ban,
}

/// Checksum algorithm selector.
///
/// Odd kinds store the sum (plus constant) directly; even kinds store its
/// one's complement. Kinds 1–2 sum whole bytes over a range, 3–4 sum both
/// nibbles of each byte over a range, 5–8 sum an explicit list of
/// individually addressed nibbles. Kinds 5–6 write into one nibble of the
/// target byte, preserving the other; 7–8 overwrite the whole byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    Byte = 1,
    ByteInverse = 2,
    HalfByte = 3,
    HalfByteInverse = 4,
    SpecHalfByte = 5,
    SpecHalfByteInverse = 6,
    SpecHalfByteOneByte = 7,
    SpecHalfByteInverseOneByte = 8,
}

impl ChecksumKind {
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            1 => ChecksumKind::Byte,
            2 => ChecksumKind::ByteInverse,
            3 => ChecksumKind::HalfByte,
            4 => ChecksumKind::HalfByteInverse,
            5 => ChecksumKind::SpecHalfByte,
            6 => ChecksumKind::SpecHalfByteInverse,
            7 => ChecksumKind::SpecHalfByteOneByte,
            8 => ChecksumKind::SpecHalfByteInverseOneByte,
            _ => return None,
        })
    }

    /// Whether the stored value is the one's complement of the sum.
    pub fn inverse(self) -> bool {
        matches!(
            self,
            ChecksumKind::ByteInverse
                | ChecksumKind::HalfByteInverse
                | ChecksumKind::SpecHalfByteInverse
                | ChecksumKind::SpecHalfByteInverseOneByte
        )
    }
}

/// One checksum program.
///
/// For kinds 1–4, `start`/`end` bound the summed byte range and `target`
/// is a byte position. For kinds 5–8, `nibbles` lists nibble positions
/// (byte index × 2, +1 for the low nibble) and `target` is itself a
/// nibble position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumSpec {
    pub kind: ChecksumKind,
    pub start: usize,
    pub end: usize,
    pub target: usize,
    pub plus: u8,
    pub nibbles: Vec<usize>,
}

/// Bit order when emitting a byte's bits onto the carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitOrder {
    #[default]
    MsbFirst,
    LsbFirst,
}

/// Where a delay-code entry fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPos {
    /// After the bits of the byte at this index.
    Byte(usize),
    /// After the whole frame (the descriptor's `-1` sentinel).
    EndOfFrame,
}

/// Pulse timing and frame-layout constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub boot: Vec<u32>,
    pub zero: Vec<u32>,
    pub one: Vec<u32>,
    pub delays: Vec<(DelayPos, Vec<u32>)>,
    /// When true the final bit needs no trailing terminator mark.
    pub last_bit_implicit_one: bool,
    pub repeat: u32,
    pub bit_order: BitOrder,
    /// `(frame position, bit count)` overrides; positions not listed use 8.
    pub bit_overrides: Vec<(usize, u8)>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            boot: Vec::new(),
            zero: Vec::new(),
            one: Vec::new(),
            delays: Vec::new(),
            last_bit_implicit_one: false,
            repeat: 1,
            bit_order: BitOrder::MsbFirst,
            bit_overrides: Vec::new(),
        }
    }
}

/// A fully parsed device descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceModel {
    /// Baseline command frame before any field write.
    pub default_frame: Vec<u8>,
    /// The frame length the descriptor declares (informational; the
    /// authoritative length is `default_frame.len()`).
    pub declared_frame_len: usize,
    pub power: FieldPrograms,
    pub mode: FieldPrograms,
    pub speed: FieldPrograms,
    pub swing: FieldPrograms,
    pub temperature: TempPrograms,
    pub functions: FunctionPrograms,
    /// Function codes applied standalone, never during state composition.
    pub solo_functions: BTreeSet<u8>,
    /// Per-mode ban records, indexed by mode ordinal. `None` is the `NA`
    /// state: no record, mode unsupported.
    pub bans: [Option<ModeBans>; 5],
    pub checksums: Vec<ChecksumSpec>,
    pub timing: Timing,
    /// Raw swing-support token, consulted by the swing capability query.
    pub swing_info: String,
}
