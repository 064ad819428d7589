//! # Codec Tests
//!
//! End-to-end coverage of the descriptor parser and frame encoder: real
//! binary descriptors are assembled by [`DescriptorBuilder`], parsed, and
//! encoded, and the resulting pulse trains are checked — in the
//! single-byte scenario down to the exact duration sequence.
//!
//! The frame-level checks decode the frame bytes back out of the pulse
//! train (the bit timings are unambiguous), so checksum and temperature
//! behavior is verified through the public surface alone.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use escarcha::descriptor::{Ban, ChecksumKind, Tag, TAG_ORDER};
use escarcha::{DeviceModel, DeviceState, FanSpeed, Function, Mode, ParseError, SwingMode};

// ============================================================================
// DESCRIPTOR BUILDER
// ============================================================================

/// Assembles binary descriptors for tests: a tag-count byte, the offset
/// table (0xFFFF for absent tags), and the concatenated segments.
struct DescriptorBuilder {
    segments: BTreeMap<u8, Vec<u8>>,
}

impl DescriptorBuilder {
    /// A minimal valid descriptor: one-byte frame `0x00`, NEC-ish
    /// timings, a power program that stamps `0xA0`/`0xAF`, and permissive
    /// ban records for every mode.
    fn new() -> Self {
        let mut builder = Self {
            segments: BTreeMap::new(),
        };
        builder
            .text(Tag::BootCode, "9000,4500")
            .text(Tag::Zero, "560,560")
            .text(Tag::One, "560,1690")
            .text(Tag::FrameLength, "1")
            .default_frame(&[0x00])
            .indexed_program(Tag::Power1, &[&[0, 0xA0], &[0, 0xAF]])
            .text(Tag::LastBit, "1")
            .text(Tag::BanCool, "S&")
            .text(Tag::BanHeat, "S&")
            .text(Tag::BanAuto, "S&")
            .text(Tag::BanFan, "S&")
            .text(Tag::BanDry, "S&");
        builder
    }

    fn text(&mut self, tag: Tag, value: &str) -> &mut Self {
        self.segments.insert(tag as u8, value.as_bytes().to_vec());
        self
    }

    fn hex(&mut self, tag: Tag, payload: &[u8]) -> &mut Self {
        let text: String = payload.iter().map(|b| format!("{:02x}", b)).collect();
        self.segments.insert(tag as u8, text.into_bytes());
        self
    }

    fn default_frame(&mut self, frame: &[u8]) -> &mut Self {
        let mut payload = vec![frame.len() as u8];
        payload.extend_from_slice(frame);
        self.hex(Tag::DefaultCode, &payload)
    }

    /// Encode an ordinal-indexed program as `[len][ops]` entries.
    fn indexed_program(&mut self, tag: Tag, entries: &[&[u8]]) -> &mut Self {
        let mut payload = Vec::new();
        for entry in entries {
            payload.push(entry.len() as u8);
            payload.extend_from_slice(entry);
        }
        self.hex(tag, &payload)
    }

    fn build(&self) -> Vec<u8> {
        let mut region = Vec::new();
        let mut offsets = Vec::new();
        for tag in TAG_ORDER {
            match self.segments.get(&(tag as u8)) {
                Some(segment) => {
                    offsets.push(region.len() as u16);
                    region.extend_from_slice(segment);
                }
                None => offsets.push(0xFFFF),
            }
        }

        let mut descriptor = vec![TAG_ORDER.len() as u8];
        for offset in offsets {
            descriptor.extend_from_slice(&offset.to_le_bytes());
        }
        descriptor.extend_from_slice(&region);
        descriptor
    }

    fn parse(&self) -> DeviceModel {
        DeviceModel::parse(&self.build()).expect("descriptor parses")
    }
}

/// Decode frame bytes back out of a pulse train produced with the
/// builder's default timings (8 bits per byte, MSB first, implicit last
/// bit, no delays, single repeat).
fn frame_from_train(durations: &[u32], frame_len: usize) -> Vec<u8> {
    let bits = &durations[2..]; // skip boot code
    assert_eq!(bits.len(), frame_len * 16);
    let mut frame = vec![0u8; frame_len];
    for byte in 0..frame_len {
        for bit in 0..8 {
            let space = bits[(byte * 8 + bit) * 2 + 1];
            let one = match space {
                1690 => true,
                560 => false,
                other => panic!("unexpected space duration {}", other),
            };
            if one {
                frame[byte] |= 0x80 >> bit;
            }
        }
    }
    frame
}

// ============================================================================
// SPECIFIED PROPERTIES
// ============================================================================

#[test]
fn single_byte_power_off_end_to_end() {
    // One zero byte, power-off writes 0xFF: the train must be the boot
    // code followed by eight one-pulses, no terminator.
    let mut builder = DescriptorBuilder::new();
    builder.indexed_program(Tag::Power1, &[&[], &[0, 0xFF]]);
    let model = builder.parse();

    let train = model.encode(&DeviceState::off()).unwrap();
    assert_eq!(
        train.durations(),
        &[
            9000, 4500, 560, 1690, 560, 1690, 560, 1690, 560, 1690, 560, 1690, 560, 1690, 560,
            1690, 560, 1690
        ]
    );
}

#[test]
fn encoding_is_pure() {
    let model = DescriptorBuilder::new().parse();
    let state = DeviceState::on(Mode::Cool, FanSpeed::Auto, 26);
    assert_eq!(
        model.encode(&state).unwrap(),
        model.encode(&state).unwrap()
    );
}

#[test]
fn repeat_count_concatenates_the_single_train() {
    let mut builder = DescriptorBuilder::new();
    let single = builder.parse().encode(&DeviceState::off()).unwrap();

    builder.text(Tag::RepeatTimes, "3");
    let tripled = builder.parse().encode(&DeviceState::off()).unwrap();

    let mut expected = Vec::new();
    for _ in 0..3 {
        expected.extend_from_slice(single.durations());
    }
    assert_eq!(tripled.durations(), expected.as_slice());
}

#[test]
fn interpreted_model_round_trips() {
    let mut builder = DescriptorBuilder::new();
    builder
        .text(Tag::FrameLength, "4")
        .default_frame(&[0x23, 0x00, 0x60, 0x00])
        .indexed_program(Tag::Power1, &[&[0, 0xA0], &[0, 0xAF]])
        // len 6, kind 2, sum [0,3) into byte 3, plus 0x07
        .text(Tag::Checksum, "060200030307");
    let model = builder.parse();

    assert_eq!(model.default_frame, vec![0x23, 0x00, 0x60, 0x00]);
    assert_eq!(model.declared_frame_len, 4);
    assert_eq!(model.timing.boot, vec![9000, 4500]);
    assert_eq!(model.timing.zero, vec![560, 560]);
    assert_eq!(model.timing.one, vec![560, 1690]);
    assert_eq!(model.checksums.len(), 1);
    let spec = &model.checksums[0];
    assert_eq!(spec.kind, ChecksumKind::ByteInverse);
    assert_eq!((spec.start, spec.end, spec.target, spec.plus), (0, 3, 3, 7));
}

#[test]
fn byte_sum_inverse_checksum_lands_in_the_frame() {
    let mut builder = DescriptorBuilder::new();
    builder
        .text(Tag::FrameLength, "4")
        .default_frame(&[0x23, 0x11, 0x60, 0x00])
        .indexed_program(Tag::Power1, &[&[0, 0xA0], &[0, 0xAF]])
        .text(Tag::Checksum, "060200030307");
    let model = builder.parse();

    let train = model.encode(&DeviceState::off()).unwrap();
    let frame = frame_from_train(train.durations(), 4);

    assert_eq!(&frame[..3], &[0xAF, 0x11, 0x60]);
    let sum = 0xAFu8.wrapping_add(0x11).wrapping_add(0x60).wrapping_add(7);
    assert_eq!(frame[3], !sum);
}

#[test]
fn dynamic_temperature_accumulates_per_step_deltas() {
    // Template: byte 1, delta 2 per step; dynamic because the length
    // byte (2) equals the remaining payload length.
    let mut builder = DescriptorBuilder::new();
    builder
        .text(Tag::FrameLength, "2")
        .default_frame(&[0x00, 0x05])
        .indexed_program(Tag::Power1, &[&[0, 0xA0], &[0, 0xAF]])
        .hex(Tag::Temp1, &[0x02, 0x01, 0x02]);
    let model = builder.parse();

    // 20° is step 4: 5 + 2·4 = 13.
    let train = model
        .encode(&DeviceState::on(Mode::Cool, FanSpeed::Auto, 20))
        .unwrap();
    assert_eq!(frame_from_train(train.durations(), 2)[1], 13);

    // 30° is step 14: 5 + 2·14 = 33. The delta scales, it does not
    // overwrite.
    let train = model
        .encode(&DeviceState::on(Mode::Cool, FanSpeed::Auto, 30))
        .unwrap();
    assert_eq!(frame_from_train(train.durations(), 2)[1], 33);
}

#[test]
fn bit_range_mode_write_replaces_only_its_bits() {
    // Mode program type 2: cool writes bits [2,5) = 0b101 of a 0xFF frame.
    // The power-on entry is left empty so nothing else touches the byte.
    let mut builder = DescriptorBuilder::new();
    builder
        .default_frame(&[0xFF])
        .indexed_program(Tag::Power1, &[&[], &[0, 0x00]])
        .indexed_program(Tag::Mode2, &[&[2, 5, 0b101]]);
    let model = builder.parse();

    let train = model
        .encode(&DeviceState::on(Mode::Cool, FanSpeed::Auto, 26))
        .unwrap();
    assert_eq!(frame_from_train(train.durations(), 1)[0], 0b1110_1111);
}

// ============================================================================
// CAPABILITIES AND BAN TOKENS
// ============================================================================

#[test]
fn na_and_empty_ban_tokens_stay_distinct() {
    let mut builder = DescriptorBuilder::new();
    builder
        .text(Tag::BanCool, "NA")
        .text(Tag::BanHeat, "")
        .text(Tag::BanAuto, "S&1|T&20");
    let model = builder.parse();

    // NA: no record at all, the mode is gone.
    assert_eq!(model.bans[Mode::Cool.index()], None);
    assert!(!model.supported_modes().contains(&Mode::Cool));
    assert!(model.supported_speeds(Mode::Cool).is_empty());

    // Empty token: the mode exists but everything in it is banned.
    let heat = model.bans[Mode::Heat.index()].as_ref().unwrap();
    assert_eq!(heat.speeds, Ban::All);
    assert_eq!(heat.temperatures, Ban::All);
    assert!(model.supported_modes().contains(&Mode::Heat));
    assert!(model.supported_speeds(Mode::Heat).is_empty());
    assert!(model.supported_temperatures(Mode::Heat).is_empty());

    // Exception lists bite exactly where they say.
    let speeds = model.supported_speeds(Mode::Auto);
    assert!(!speeds.contains(&FanSpeed::Low));
    assert_eq!(speeds.len(), 3);
    let temps = model.supported_temperatures(Mode::Auto);
    assert!(!temps.contains(&20));
    assert_eq!(temps.len(), 14);
}

#[test]
fn swing_capability_needs_token_and_program() {
    let mut builder = DescriptorBuilder::new();
    builder.text(Tag::SwingInfo, "1,2");
    assert!(builder.parse().supported_swing().is_empty());

    builder.indexed_program(Tag::Swing1, &[&[0, 0x01], &[0, 0x02]]);
    assert_eq!(
        builder.parse().supported_swing(),
        vec![SwingMode::On, SwingMode::Off]
    );

    builder.text(Tag::SwingInfo, "0");
    assert!(builder.parse().supported_swing().is_empty());
}

#[test]
fn solo_function_is_skipped_during_composition() {
    // Swing marked solo: composing a state writes no swing bits, the
    // dedicated press does.
    let mut builder = DescriptorBuilder::new();
    builder
        .text(Tag::SwingInfo, "1,2")
        .indexed_program(Tag::Swing1, &[&[0, 0x0E], &[0, 0x0F]])
        // [len][function6][ops: byte 0 <- 0x0E]
        .hex(Tag::SoloFunction, &[0x01, 0x06])
        .indexed_program(Tag::Function1, &[&[6, 0, 0x0E]]);
    let model = builder.parse();

    let composed = model
        .encode(&DeviceState::on(Mode::Cool, FanSpeed::Auto, 26).with_swing(SwingMode::On))
        .unwrap();
    // Power-on wrote 0xA0 and nothing touched it afterwards.
    assert_eq!(frame_from_train(composed.durations(), 1)[0], 0xA0);

    let pressed = model
        .encode(
            &DeviceState::on(Mode::Cool, FanSpeed::Auto, 26).with_function(Function::WindSwing),
        )
        .unwrap();
    assert_eq!(frame_from_train(pressed.durations(), 1)[0], 0x0E);
}

// ============================================================================
// PARSE FAILURES
// ============================================================================

#[test]
fn truncated_and_unknown_layouts_are_rejected() {
    assert_eq!(DeviceModel::parse(&[]).unwrap_err(), ParseError::Truncated);
    // 29 tags declared, no room for the offset table.
    assert_eq!(
        DeviceModel::parse(&[29, 0x00, 0x00]).unwrap_err(),
        ParseError::Truncated
    );
    assert_eq!(
        DeviceModel::parse(&[7, 0, 0]).unwrap_err(),
        ParseError::UnsupportedLayout { tag_count: 7 }
    );
}

#[test]
fn malformed_segments_name_their_tag() {
    let mut builder = DescriptorBuilder::new();
    builder.text(Tag::BootCode, "9000,nope");
    assert_eq!(
        DeviceModel::parse(&builder.build()).unwrap_err(),
        ParseError::Malformed(Tag::BootCode)
    );

    let mut builder = DescriptorBuilder::new();
    builder.text(Tag::DefaultCode, "01zz");
    assert_eq!(
        DeviceModel::parse(&builder.build()).unwrap_err(),
        ParseError::Malformed(Tag::DefaultCode)
    );

    // A write past the one-byte frame is structural, not clamped.
    let mut builder = DescriptorBuilder::new();
    builder.indexed_program(Tag::Mode1, &[&[4, 0x01]]);
    assert_eq!(
        DeviceModel::parse(&builder.build()).unwrap_err(),
        ParseError::Malformed(Tag::Mode1)
    );
}

#[test]
fn missing_mandatory_segment_is_malformed() {
    let mut builder = DescriptorBuilder::new();
    builder.segments.remove(&(Tag::BootCode as u8));
    assert_eq!(
        DeviceModel::parse(&builder.build()).unwrap_err(),
        ParseError::Malformed(Tag::BootCode)
    );
}
