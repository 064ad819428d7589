//! Binary descriptor parsing.
//!
//! A descriptor is a one-byte tag count, a table of little-endian u16
//! offsets (one per tag), and a data region the offsets index into. Each
//! segment is UTF-8 text in one of a handful of sub-grammars:
//!
//! - comma-separated durations (boot code, zero, one)
//! - pipe-separated `pos&…` records (delay code, bit widths)
//! - plain integers (frame length, endian, last bit, repeat)
//! - raw tokens (swing info, per-mode bans)
//! - hex strings wrapping `[length][payload]` entries (default frame,
//!   write programs, checksums, solo functions)
//!
//! Parsing is all-or-nothing: any malformed segment rejects the whole
//! descriptor. Every byte index and bit range decoded here is validated
//! against the default frame — an out-of-bounds operand is a structural
//! failure, never a clamp.

use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::model::{
    Ban, BitOrder, ChecksumKind, ChecksumSpec, DelayPos, DeviceModel, FieldPrograms,
    FunctionPrograms, ModeBans, TempProgram, TempPrograms, Timing, WriteOp,
};
use crate::descriptor::spans::resolve_spans;
use crate::descriptor::tags::{TAG_ORDER, Tag};
use crate::error::ParseError;

/// Number of temperature steps a device can address (16°–30°).
pub const TEMP_STEPS: usize = 15;

/// Parse a raw descriptor buffer into a [`DeviceModel`].
pub fn parse(data: &[u8]) -> Result<DeviceModel, ParseError> {
    let &tag_count = data.first().ok_or(ParseError::Truncated)?;
    if tag_count as usize != TAG_ORDER.len() {
        return Err(ParseError::UnsupportedLayout { tag_count });
    }

    let table_len = 1 + 2 * tag_count as usize;
    if data.len() < table_len {
        return Err(ParseError::Truncated);
    }

    let offsets: Vec<u16> = data[1..table_len]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let region = &data[table_len..];
    let spans =
        resolve_spans(&offsets, region.len()).map_err(|tag_index| ParseError::Malformed(TAG_ORDER[tag_index]))?;

    let segments = Segments {
        region,
        spans: &spans,
    };

    // The default frame bounds every write operand, so it parses first.
    let default_frame = parse_default_frame(segments.required(Tag::DefaultCode)?)?;
    let frame_len = default_frame.len();

    let declared_frame_len = parse_int::<usize>(segments.required_text(Tag::FrameLength)?, Tag::FrameLength)?;

    let power = FieldPrograms {
        type1: parse_indexed_pairs(segments.text(Tag::Power1)?, frame_len, Tag::Power1)?,
        type2: Vec::new(),
    };
    if power.type1.is_empty() {
        return Err(ParseError::Malformed(Tag::Power1));
    }

    let mode = FieldPrograms {
        type1: parse_indexed_pairs(segments.text(Tag::Mode1)?, frame_len, Tag::Mode1)?,
        type2: parse_indexed_triples(segments.text(Tag::Mode2)?, frame_len, Tag::Mode2)?,
    };
    let speed = FieldPrograms {
        type1: parse_indexed_pairs(segments.text(Tag::Speed1)?, frame_len, Tag::Speed1)?,
        type2: parse_indexed_triples(segments.text(Tag::Speed2)?, frame_len, Tag::Speed2)?,
    };
    let swing = FieldPrograms {
        type1: parse_indexed_pairs(segments.text(Tag::Swing1)?, frame_len, Tag::Swing1)?,
        type2: parse_indexed_triples(segments.text(Tag::Swing2)?, frame_len, Tag::Swing2)?,
    };

    let temperature = TempPrograms {
        type1: parse_temperature(segments.text(Tag::Temp1)?, frame_len, Tag::Temp1, OpShape::Pair)?,
        type2: parse_temperature(segments.text(Tag::Temp2)?, frame_len, Tag::Temp2, OpShape::Triple)?,
    };

    let functions = FunctionPrograms {
        type1: parse_functions(segments.text(Tag::Function1)?, frame_len, Tag::Function1, OpShape::Pair)?,
        type2: parse_functions(segments.text(Tag::Function2)?, frame_len, Tag::Function2, OpShape::Triple)?,
    };

    let solo_functions = parse_solo(segments.text(Tag::SoloFunction)?)?;

    let bans = [
        parse_ban(segments.text(Tag::BanCool)?, Tag::BanCool)?,
        parse_ban(segments.text(Tag::BanHeat)?, Tag::BanHeat)?,
        parse_ban(segments.text(Tag::BanAuto)?, Tag::BanAuto)?,
        parse_ban(segments.text(Tag::BanFan)?, Tag::BanFan)?,
        parse_ban(segments.text(Tag::BanDry)?, Tag::BanDry)?,
    ];

    let checksums = parse_checksums(segments.text(Tag::Checksum)?, frame_len)?;

    let timing = Timing {
        boot: parse_durations(segments.required_text(Tag::BootCode)?, Tag::BootCode)?,
        zero: parse_durations(segments.required_text(Tag::Zero)?, Tag::Zero)?,
        one: parse_durations(segments.required_text(Tag::One)?, Tag::One)?,
        delays: parse_delays(segments.text(Tag::DelayCode)?, frame_len)?,
        last_bit_implicit_one: parse_optional_int::<i64>(segments.text(Tag::LastBit)?, Tag::LastBit)?
            .unwrap_or(0)
            != 0,
        repeat: parse_optional_int::<u32>(segments.text(Tag::RepeatTimes)?, Tag::RepeatTimes)?.unwrap_or(1),
        bit_order: match parse_optional_int::<i64>(segments.text(Tag::Endian)?, Tag::Endian)?.unwrap_or(0) {
            0 => BitOrder::MsbFirst,
            _ => BitOrder::LsbFirst,
        },
        bit_overrides: parse_bit_overrides(segments.text(Tag::BitNum)?, frame_len)?,
    };

    let swing_info = segments.text(Tag::SwingInfo)?.to_owned();

    Ok(DeviceModel {
        default_frame,
        declared_frame_len,
        power,
        mode,
        speed,
        swing,
        temperature,
        functions,
        solo_functions,
        bans,
        checksums,
        timing,
        swing_info,
    })
}

/// Resolved segment access, keyed by tag.
struct Segments<'a> {
    region: &'a [u8],
    spans: &'a [std::ops::Range<usize>],
}

impl<'a> Segments<'a> {
    fn bytes(&self, tag: Tag) -> &'a [u8] {
        let index = TAG_ORDER
            .iter()
            .position(|&t| t == tag)
            .expect("tag is in TAG_ORDER");
        &self.region[self.spans[index].clone()]
    }

    fn text(&self, tag: Tag) -> Result<&'a str, ParseError> {
        std::str::from_utf8(self.bytes(tag)).map_err(|_| ParseError::Malformed(tag))
    }

    fn required(&self, tag: Tag) -> Result<&'a [u8], ParseError> {
        let bytes = self.bytes(tag);
        if bytes.is_empty() {
            return Err(ParseError::Malformed(tag));
        }
        Ok(bytes)
    }

    fn required_text(&self, tag: Tag) -> Result<&'a str, ParseError> {
        std::str::from_utf8(self.required(tag)?).map_err(|_| ParseError::Malformed(tag))
    }
}

/// Shape of the write operations inside a hex program.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OpShape {
    /// `(byte index, value)` pairs — type 1.
    Pair,
    /// `(start bit, end bit, value)` triples — type 2.
    Triple,
}

fn decode_hex(text: &str, tag: Tag) -> Result<Vec<u8>, ParseError> {
    if text.len() % 2 != 0 {
        return Err(ParseError::Malformed(tag));
    }
    let digit = |c: u8| -> Result<u8, ParseError> {
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'a'..=b'f' => Ok(c - b'a' + 10),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => Err(ParseError::Malformed(tag)),
        }
    };
    text.as_bytes()
        .chunks_exact(2)
        .map(|pair| Ok(digit(pair[0])? << 4 | digit(pair[1])?))
        .collect()
}

/// Walk a concatenation of `[length][payload]` entries.
fn walk_entries(payload: &[u8], tag: Tag) -> Result<Vec<&[u8]>, ParseError> {
    let mut entries = Vec::new();
    let mut index = 0;
    while index < payload.len() {
        let len = payload[index] as usize;
        index += 1;
        let entry = payload
            .get(index..index + len)
            .ok_or(ParseError::Malformed(tag))?;
        entries.push(entry);
        index += len;
    }
    Ok(entries)
}

fn ops_from_pairs(bytes: &[u8], frame_len: usize, tag: Tag) -> Result<Vec<WriteOp>, ParseError> {
    if bytes.len() % 2 != 0 {
        return Err(ParseError::Malformed(tag));
    }
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let index = pair[0] as usize;
            if index >= frame_len {
                return Err(ParseError::Malformed(tag));
            }
            Ok(WriteOp::ByteSet {
                index,
                value: pair[1],
            })
        })
        .collect()
}

fn ops_from_triples(bytes: &[u8], frame_len: usize, tag: Tag) -> Result<Vec<WriteOp>, ParseError> {
    if bytes.len() % 3 != 0 {
        return Err(ParseError::Malformed(tag));
    }
    bytes
        .chunks_exact(3)
        .map(|triple| {
            let start = triple[0] as usize;
            let end = triple[1] as usize;
            // The write mask covers at most one spilled byte, so a range is
            // limited to eight bits and must stay inside the frame.
            if start >= end || end - start > 8 || end > frame_len * 8 {
                return Err(ParseError::Malformed(tag));
            }
            Ok(WriteOp::BitRange {
                start,
                end,
                value: triple[2],
            })
        })
        .collect()
}

fn ops_from_shape(
    bytes: &[u8],
    frame_len: usize,
    tag: Tag,
    shape: OpShape,
) -> Result<Vec<WriteOp>, ParseError> {
    match shape {
        OpShape::Pair => ops_from_pairs(bytes, frame_len, tag),
        OpShape::Triple => ops_from_triples(bytes, frame_len, tag),
    }
}

/// Parse an ordinal-indexed program: one `[length][ops]` entry per value.
fn parse_indexed_pairs(text: &str, frame_len: usize, tag: Tag) -> Result<Vec<Vec<WriteOp>>, ParseError> {
    parse_indexed(text, frame_len, tag, OpShape::Pair)
}

fn parse_indexed_triples(text: &str, frame_len: usize, tag: Tag) -> Result<Vec<Vec<WriteOp>>, ParseError> {
    parse_indexed(text, frame_len, tag, OpShape::Triple)
}

fn parse_indexed(
    text: &str,
    frame_len: usize,
    tag: Tag,
    shape: OpShape,
) -> Result<Vec<Vec<WriteOp>>, ParseError> {
    let payload = decode_hex(text, tag)?;
    walk_entries(&payload, tag)?
        .into_iter()
        .map(|entry| ops_from_shape(entry, frame_len, tag, shape))
        .collect()
}

fn parse_default_frame(bytes: &[u8]) -> Result<Vec<u8>, ParseError> {
    let tag = Tag::DefaultCode;
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::Malformed(tag))?;
    let payload = decode_hex(text, tag)?;
    let (&len, rest) = payload.split_first().ok_or(ParseError::Malformed(tag))?;
    let frame = rest.get(..len as usize).ok_or(ParseError::Malformed(tag))?;
    if frame.is_empty() {
        return Err(ParseError::Malformed(tag));
    }
    Ok(frame.to_vec())
}

/// Parse a temperature program, discriminating static tables from dynamic
/// templates.
///
/// The program is dynamic exactly when its leading length byte equals the
/// remaining payload length: the payload is then a single repeating
/// `(position, per-step delta)` template rather than a concatenation of
/// per-step entries. Dynamic templates are expanded here, once, into one
/// segment per temperature step with each delta pre-multiplied by the
/// step (modulo 256).
fn parse_temperature(
    text: &str,
    frame_len: usize,
    tag: Tag,
    shape: OpShape,
) -> Result<TempProgram, ParseError> {
    if text.is_empty() {
        return Ok(TempProgram::default());
    }

    let payload = decode_hex(text, tag)?;
    let (&seg_len, template) = payload.split_first().ok_or(ParseError::Malformed(tag))?;

    if seg_len as usize != template.len() {
        // Static: independent per-step entries.
        let steps = walk_entries(&payload, tag)?
            .into_iter()
            .map(|entry| ops_from_shape(entry, frame_len, tag, shape))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(TempProgram {
            steps,
            dynamic: false,
        });
    }

    let mut steps = Vec::with_capacity(TEMP_STEPS);
    for step in 0..TEMP_STEPS as u16 {
        let mut ops = Vec::new();
        match shape {
            OpShape::Pair => {
                // Template pairs are (byte index, per-step delta).
                let mut i = 1;
                while i < seg_len as usize {
                    let index = template[i - 1] as usize;
                    if index >= frame_len {
                        return Err(ParseError::Malformed(tag));
                    }
                    let delta = template[i] as u16;
                    ops.push(WriteOp::ByteSet {
                        index,
                        value: (delta * step % 256) as u8,
                    });
                    i += 2;
                }
            }
            OpShape::Triple => {
                // Template triples are (start bit, end bit, per-step delta).
                let mut i = 2;
                while i < seg_len as usize {
                    let start = template[i - 2] as usize;
                    let end = template[i - 1] as usize;
                    if start >= end || end - start > 8 || end > frame_len * 8 {
                        return Err(ParseError::Malformed(tag));
                    }
                    let delta = template[i] as u16;
                    ops.push(WriteOp::BitRange {
                        start,
                        end,
                        value: (delta * step % 256) as u8,
                    });
                    i += 3;
                }
            }
        }
        steps.push(ops);
    }

    Ok(TempProgram {
        steps,
        dynamic: true,
    })
}

/// Parse function-press programs: each entry is `[code][ops…]`.
fn parse_functions(
    text: &str,
    frame_len: usize,
    tag: Tag,
    shape: OpShape,
) -> Result<BTreeMap<u8, Vec<WriteOp>>, ParseError> {
    let payload = decode_hex(text, tag)?;
    let mut programs = BTreeMap::new();
    for entry in walk_entries(&payload, tag)? {
        let (&code, ops) = entry.split_first().ok_or(ParseError::Malformed(tag))?;
        programs.insert(code, ops_from_shape(ops, frame_len, tag, shape)?);
    }
    Ok(programs)
}

/// Parse the solo-function set: `[length][code…]` as one hex entry.
fn parse_solo(text: &str) -> Result<BTreeSet<u8>, ParseError> {
    // Fewer than two payload bytes means no solo functions at all.
    if text.len() < 4 {
        return Ok(BTreeSet::new());
    }
    let payload = decode_hex(text, Tag::SoloFunction)?;
    Ok(payload[1..].iter().copied().collect())
}

/// Parse one mode's ban token.
///
/// `NA` records nothing at all (the mode is unsupported); the empty token
/// records a ban of every speed and temperature; `S`/`T` ban a whole
/// field; `S&…`/`T&…` ban the listed values. Temperature lists are
/// absolute degrees and are stored as 0-based steps; values outside the
/// device's range are inert and dropped.
fn parse_ban(text: &str, tag: Tag) -> Result<Option<ModeBans>, ParseError> {
    if text == "NA" {
        return Ok(None);
    }
    if text.is_empty() {
        return Ok(Some(ModeBans {
            speeds: Ban::All,
            temperatures: Ban::All,
        }));
    }

    let mut bans = ModeBans::default();
    let mut recognized = false;
    for record in text.split('|') {
        match record {
            "S" | "s" => {
                bans.speeds = Ban::All;
                recognized = true;
            }
            "T" | "t" => {
                bans.temperatures = Ban::All;
                recognized = true;
            }
            _ if record.starts_with("S&") || record.starts_with("s&") => {
                bans.speeds = Ban::Listed(parse_ban_list(&record[2..], tag)?);
                recognized = true;
            }
            _ if record.starts_with("T&") || record.starts_with("t&") => {
                let degrees = parse_ban_list(&record[2..], tag)?;
                let steps = degrees
                    .into_iter()
                    .filter_map(|deg| deg.checked_sub(16))
                    .filter(|&step| (step as usize) < TEMP_STEPS)
                    .collect();
                bans.temperatures = Ban::Listed(steps);
                recognized = true;
            }
            _ => {}
        }
    }
    // A token with no recognizable record leaves no ban at all, like NA.
    if !recognized {
        return Ok(None);
    }
    Ok(Some(bans))
}

fn parse_ban_list(list: &str, tag: Tag) -> Result<Vec<u8>, ParseError> {
    list.split(',')
        .filter(|token| !token.is_empty())
        .map(|token| token.trim().parse::<u8>().map_err(|_| ParseError::Malformed(tag)))
        .collect()
}

/// Parse the checksum program list: pipe-separated hex entries of
/// `[length][kind][operands…]`. Entries of at most one byte are skipped.
fn parse_checksums(text: &str, frame_len: usize) -> Result<Vec<ChecksumSpec>, ParseError> {
    let tag = Tag::Checksum;
    let mut specs = Vec::new();

    for token in text.split('|') {
        let data = decode_hex(token, tag)?;
        if data.len() <= 1 {
            continue;
        }
        let declared_len = data[0] as usize;
        let kind = ChecksumKind::from_raw(data[1]).ok_or(ParseError::Malformed(tag))?;

        let spec = match kind {
            ChecksumKind::Byte
            | ChecksumKind::ByteInverse
            | ChecksumKind::HalfByte
            | ChecksumKind::HalfByteInverse => {
                if data.len() < 5 {
                    return Err(ParseError::Malformed(tag));
                }
                let start = data[2] as usize;
                let end = data[3] as usize;
                let target = data[4] as usize;
                if end > frame_len || target >= frame_len {
                    return Err(ParseError::Malformed(tag));
                }
                let plus = if declared_len > 4 {
                    *data.get(5).ok_or(ParseError::Malformed(tag))?
                } else {
                    0
                };
                ChecksumSpec {
                    kind,
                    start,
                    end,
                    target,
                    plus,
                    nibbles: Vec::new(),
                }
            }
            ChecksumKind::SpecHalfByte
            | ChecksumKind::SpecHalfByteInverse
            | ChecksumKind::SpecHalfByteOneByte
            | ChecksumKind::SpecHalfByteInverseOneByte => {
                if data.len() < 4 {
                    return Err(ParseError::Malformed(tag));
                }
                let target = data[2] as usize;
                if target >> 1 >= frame_len {
                    return Err(ParseError::Malformed(tag));
                }
                let nibbles = data[4..]
                    .iter()
                    .map(|&pos| {
                        let pos = pos as usize;
                        if pos >> 1 >= frame_len {
                            return Err(ParseError::Malformed(tag));
                        }
                        Ok(pos)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ChecksumSpec {
                    kind,
                    start: 0,
                    end: 0,
                    target,
                    plus: data[3],
                    nibbles,
                }
            }
        };
        specs.push(spec);
    }

    Ok(specs)
}

fn parse_durations(text: &str, tag: Tag) -> Result<Vec<u32>, ParseError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<u32>().map_err(|_| ParseError::Malformed(tag)))
        .collect()
}

/// Parse delay records: `pos&t1,t2,…` pipe-separated. Position `-1` is
/// the end-of-frame sentinel; times wrap modulo 65536.
fn parse_delays(text: &str, frame_len: usize) -> Result<Vec<(DelayPos, Vec<u32>)>, ParseError> {
    let tag = Tag::DelayCode;
    let mut delays = Vec::new();

    for record in text.split('|') {
        let Some((pos_token, times_token)) = record.split_once('&') else {
            continue;
        };
        let pos = parse_signed_pos(pos_token, frame_len, tag)?
            .map_or(DelayPos::EndOfFrame, DelayPos::Byte);
        let times = times_token
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                let time = token.parse::<i64>().map_err(|_| ParseError::Malformed(tag))?;
                Ok(time.rem_euclid(65536) as u32)
            })
            .collect::<Result<Vec<_>, ParseError>>()?;
        delays.push((pos, times));
    }

    Ok(delays)
}

/// Parse bit-width overrides: `pos&bits` pipe-separated. Position `-1`
/// names the last frame byte.
fn parse_bit_overrides(text: &str, frame_len: usize) -> Result<Vec<(usize, u8)>, ParseError> {
    let tag = Tag::BitNum;
    let mut overrides = Vec::new();

    for record in text.split('|') {
        let Some((pos_token, bits_token)) = record.split_once('&') else {
            continue;
        };
        let pos = match parse_signed_pos(pos_token, frame_len, tag)? {
            Some(pos) => pos,
            // -1 resolves to the final byte here, not a sentinel.
            None => frame_len.saturating_sub(1),
        };
        let bits = bits_token
            .trim()
            .parse::<u8>()
            .map_err(|_| ParseError::Malformed(tag))?;
        if !(1..=8).contains(&bits) {
            return Err(ParseError::Malformed(tag));
        }
        overrides.push((pos, bits));
    }

    Ok(overrides)
}

/// Parse a frame position that may be `-1`; returns `None` for `-1`.
fn parse_signed_pos(token: &str, frame_len: usize, tag: Tag) -> Result<Option<usize>, ParseError> {
    let pos = token
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::Malformed(tag))?;
    match pos {
        -1 => Ok(None),
        p if p >= 0 && (p as usize) < frame_len => Ok(Some(p as usize)),
        _ => Err(ParseError::Malformed(tag)),
    }
}

fn parse_int<T: std::str::FromStr>(text: &str, tag: Tag) -> Result<T, ParseError> {
    text.trim().parse::<T>().map_err(|_| ParseError::Malformed(tag))
}

fn parse_optional_int<T: std::str::FromStr>(text: &str, tag: Tag) -> Result<Option<T>, ParseError> {
    if text.is_empty() {
        return Ok(None);
    }
    parse_int(text, tag).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(decode_hex("00ff10", Tag::DefaultCode).unwrap(), vec![0x00, 0xFF, 0x10]);
        assert_eq!(decode_hex("", Tag::DefaultCode).unwrap(), Vec::<u8>::new());
        assert!(decode_hex("0", Tag::DefaultCode).is_err());
        assert!(decode_hex("zz", Tag::DefaultCode).is_err());
    }

    #[test]
    fn entry_walk_uses_embedded_lengths() {
        // Two entries: [2, aa, bb] and [1, cc]. A `&`-style split would
        // misread this; the embedded lengths are authoritative.
        let entries = walk_entries(&[2, 0xAA, 0xBB, 1, 0xCC], Tag::Mode1).unwrap();
        assert_eq!(entries, vec![&[0xAA, 0xBB][..], &[0xCC][..]]);
    }

    #[test]
    fn entry_overrun_is_malformed() {
        assert!(walk_entries(&[3, 0xAA], Tag::Mode1).is_err());
    }

    #[test]
    fn pair_ops_validate_frame_bounds() {
        assert!(ops_from_pairs(&[9, 0x55], 4, Tag::Mode1).is_err());
        assert_eq!(
            ops_from_pairs(&[2, 0x55], 4, Tag::Mode1).unwrap(),
            vec![WriteOp::ByteSet { index: 2, value: 0x55 }]
        );
    }

    #[test]
    fn triple_ops_validate_bit_ranges() {
        // 4-byte frame: 32 addressable bits.
        assert!(ops_from_triples(&[30, 33, 1], 4, Tag::Mode2).is_err());
        assert!(ops_from_triples(&[5, 5, 1], 4, Tag::Mode2).is_err());
        assert!(ops_from_triples(&[0, 9, 1], 4, Tag::Mode2).is_err());
        assert_eq!(
            ops_from_triples(&[6, 10, 3], 4, Tag::Mode2).unwrap(),
            vec![WriteOp::BitRange { start: 6, end: 10, value: 3 }]
        );
    }

    #[test]
    fn temperature_static_vs_dynamic() {
        // Static: first length byte (2) != remaining length (8), so this
        // is three independent per-step entries.
        let static_text = "020110020111020112";
        let program = parse_temperature(static_text, 4, Tag::Temp1, OpShape::Pair).unwrap();
        assert!(!program.dynamic);
        assert_eq!(program.steps.len(), 3);
        assert_eq!(program.steps[2], vec![WriteOp::ByteSet { index: 1, value: 0x12 }]);

        // Dynamic: first length byte (2) == remaining length. Template is
        // (byte 1, delta 3); step N writes 3·N.
        let dynamic_text = "020103";
        let program = parse_temperature(dynamic_text, 4, Tag::Temp1, OpShape::Pair).unwrap();
        assert!(program.dynamic);
        assert_eq!(program.steps.len(), TEMP_STEPS);
        assert_eq!(program.steps[0], vec![WriteOp::ByteSet { index: 1, value: 0 }]);
        assert_eq!(program.steps[4], vec![WriteOp::ByteSet { index: 1, value: 12 }]);
    }

    #[test]
    fn dynamic_triple_template_expands_per_step() {
        // Length 3 == remaining length: dynamic (start 4, end 8, delta 2).
        let program = parse_temperature("03040802", 4, Tag::Temp2, OpShape::Triple).unwrap();
        assert!(program.dynamic);
        assert_eq!(
            program.steps[3],
            vec![WriteOp::BitRange { start: 4, end: 8, value: 6 }]
        );
    }

    #[test]
    fn ban_token_grammar() {
        assert_eq!(parse_ban("NA", Tag::BanCool).unwrap(), None);

        let all = parse_ban("", Tag::BanCool).unwrap().unwrap();
        assert_eq!(all.speeds, Ban::All);
        assert_eq!(all.temperatures, Ban::All);

        let speeds = parse_ban("S", Tag::BanCool).unwrap().unwrap();
        assert_eq!(speeds.speeds, Ban::All);
        assert_eq!(speeds.temperatures, Ban::None);

        let listed = parse_ban("s&1,3|T&17,18", Tag::BanCool).unwrap().unwrap();
        assert_eq!(listed.speeds, Ban::Listed(vec![1, 3]));
        // Degrees convert to 0-based steps.
        assert_eq!(listed.temperatures, Ban::Listed(vec![1, 2]));
    }

    #[test]
    fn unrecognized_ban_records_leave_no_ban() {
        assert_eq!(parse_ban("X", Tag::BanFan).unwrap(), None);
        // An empty exception list still counts as a record.
        let bans = parse_ban("S&", Tag::BanFan).unwrap().unwrap();
        assert_eq!(bans.speeds, Ban::Listed(Vec::new()));
    }

    #[test]
    fn ban_list_drops_out_of_range_degrees() {
        let bans = parse_ban("T&15,16,31", Tag::BanHeat).unwrap().unwrap();
        assert_eq!(bans.temperatures, Ban::Listed(vec![0]));
    }

    #[test]
    fn checksum_entry_kinds() {
        // len 5, kind 2, sum [0,3) into byte 3, plus 0x10.
        let specs = parse_checksums("050200030310", 4).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, ChecksumKind::ByteInverse);
        assert_eq!((specs[0].start, specs[0].end, specs[0].target), (0, 3, 3));
        assert_eq!(specs[0].plus, 0x10);

        // Nibble kind: len 4, kind 5, target nibble 6, plus 0, nibbles 0 and 3.
        let specs = parse_checksums("040506000003", 4).unwrap();
        assert_eq!(specs[0].kind, ChecksumKind::SpecHalfByte);
        assert_eq!(specs[0].target, 6);
        assert_eq!(specs[0].nibbles, vec![0, 3]);
    }

    #[test]
    fn checksum_rejects_unknown_kind_and_bounds() {
        assert!(parse_checksums("0509000303", 4).is_err());
        // end byte 9 past a 4-byte frame
        assert!(parse_checksums("0502000903", 4).is_err());
    }

    #[test]
    fn delay_and_bit_override_records() {
        let delays = parse_delays("1&560,20000|-1&5000", 4).unwrap();
        assert_eq!(delays[0], (DelayPos::Byte(1), vec![560, 20000]));
        assert_eq!(delays[1], (DelayPos::EndOfFrame, vec![5000]));

        let overrides = parse_bit_overrides("0&4|-1&7", 4).unwrap();
        assert_eq!(overrides, vec![(0, 4), (3, 7)]);
    }

    #[test]
    fn delay_times_wrap_to_u16() {
        let delays = parse_delays("0&70000", 4).unwrap();
        assert_eq!(delays[0].1, vec![70000 % 65536]);
    }

    #[test]
    fn solo_set_needs_two_payload_bytes() {
        assert!(parse_solo("02").unwrap().is_empty());
        let solo = parse_solo("020306").unwrap();
        assert!(solo.contains(&3) && solo.contains(&6));
    }
}
