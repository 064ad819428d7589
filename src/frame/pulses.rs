//! Pulse-train assembly.
//!
//! The composed frame is modulated onto the infrared carrier as a
//! sequence of mark/space durations: the boot code, then each byte's bits
//! (one-pulse or zero-pulse per bit, bit count and order per the
//! descriptor), delay insertions at registered positions, an optional
//! terminator mark, and finally whole-sequence repetition.
//!
//! The codec emits magnitudes only. Transports that need signed
//! durations negate the odd-indexed entries via [`PulseTrain::signed`];
//! unit scaling and wire formats are equally theirs.

use crate::descriptor::{BitOrder, DelayPos, Timing};

/// An ordered sequence of pulse durations, logically paired as mark/space
/// alternations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseTrain(Vec<u32>);

impl PulseTrain {
    /// Wrap a raw duration sequence.
    pub fn from_durations(durations: Vec<u32>) -> Self {
        Self(durations)
    }

    /// The raw magnitudes.
    pub fn durations(&self) -> &[u32] {
        &self.0
    }

    /// The durations under the transport sign convention: odd-indexed
    /// entries (the "off" spans) negated.
    pub fn signed(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().enumerate().map(|(i, &duration)| {
            if i % 2 == 1 {
                -(duration as i64)
            } else {
                duration as i64
            }
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

/// Modulate a composed frame into its pulse train.
pub(crate) fn assemble(frame: &[u8], timing: &Timing) -> PulseTrain {
    let mut once: Vec<u32> = Vec::new();
    once.extend_from_slice(&timing.boot);

    for (index, &byte) in frame.iter().enumerate() {
        let bits = u32::from(bits_at(timing, index));
        for j in 0..bits {
            let mask = match timing.bit_order {
                BitOrder::MsbFirst => (1u32 << (bits - 1)) >> j,
                BitOrder::LsbFirst => 1u32 << j,
            };
            if u32::from(byte) & mask != 0 {
                once.extend_from_slice(&timing.one);
            } else {
                once.extend_from_slice(&timing.zero);
            }
        }
        for (pos, times) in &timing.delays {
            if *pos == DelayPos::Byte(index) {
                once.extend_from_slice(times);
            }
        }
    }

    // Without an implicit final one-bit the burst must still end on a
    // mark, so a bare one-mark terminates it.
    if !timing.last_bit_implicit_one {
        if let Some(&mark) = timing.one.first() {
            once.push(mark);
        }
    }

    for (pos, times) in &timing.delays {
        if *pos == DelayPos::EndOfFrame {
            once.extend_from_slice(times);
        }
    }

    let mut train = Vec::with_capacity(once.len() * timing.repeat as usize);
    for _ in 0..timing.repeat {
        train.extend_from_slice(&once);
    }
    PulseTrain(train)
}

/// Bit count for the byte at `index`: the override registered for exactly
/// that position, or 8.
fn bits_at(timing: &Timing, index: usize) -> u8 {
    for &(pos, bits) in &timing.bit_overrides {
        if pos == index {
            return bits;
        }
        if pos > index {
            break;
        }
    }
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> Timing {
        Timing {
            boot: vec![9000, 4500],
            zero: vec![560, 560],
            one: vec![560, 1690],
            last_bit_implicit_one: true,
            ..Timing::default()
        }
    }

    #[test]
    fn msb_first_emission() {
        let train = assemble(&[0b1000_0001], &timing());
        assert_eq!(
            train.durations(),
            &[9000, 4500, 560, 1690, 560, 560, 560, 560, 560, 560, 560, 560, 560, 560, 560, 560, 560, 1690]
        );
    }

    #[test]
    fn lsb_first_reverses_bit_order() {
        let mut timing = timing();
        timing.bit_order = BitOrder::LsbFirst;
        let train = assemble(&[0b0000_0001], &timing);
        // The set bit leads now.
        assert_eq!(&train.durations()[2..4], &[560, 1690]);
        assert_eq!(&train.durations()[4..6], &[560, 560]);
    }

    #[test]
    fn bit_override_applies_to_its_byte_only() {
        let mut timing = timing();
        timing.bit_overrides = vec![(0, 4)];
        let train = assemble(&[0x00, 0x00], &timing);
        // 2 boot entries + (4 + 8) zero-bit pairs.
        assert_eq!(train.len(), 2 + 2 * 12);
    }

    #[test]
    fn terminator_mark_when_last_bit_not_implicit() {
        let mut timing = timing();
        timing.last_bit_implicit_one = false;
        let train = assemble(&[0x00], &timing);
        // Eight zero pairs plus the bare one-mark.
        assert_eq!(train.len(), 2 + 16 + 1);
        assert_eq!(*train.durations().last().unwrap(), 560);
    }

    #[test]
    fn delays_fire_after_their_byte_and_at_frame_end() {
        let mut timing = timing();
        timing.delays = vec![
            (DelayPos::Byte(0), vec![20000]),
            (DelayPos::EndOfFrame, vec![5000, 5000]),
        ];
        let train = assemble(&[0x00, 0x00], &timing);
        assert_eq!(train.durations()[2 + 16], 20000);
        assert_eq!(&train.durations()[train.len() - 2..], &[5000, 5000]);
    }

    #[test]
    fn repeat_concatenates_verbatim() {
        let mut timing = timing();
        let single = assemble(&[0xA5], &timing);
        timing.repeat = 3;
        let triple = assemble(&[0xA5], &timing);
        assert_eq!(triple.len(), 3 * single.len());
        assert_eq!(&triple.durations()[..single.len()], single.durations());
        assert_eq!(&triple.durations()[2 * single.len()..], single.durations());
    }

    #[test]
    fn signed_negates_odd_indices() {
        let train = PulseTrain::from_durations(vec![100, 200, 300]);
        let signed: Vec<i64> = train.signed().collect();
        assert_eq!(signed, vec![100, -200, 300]);
    }
}
