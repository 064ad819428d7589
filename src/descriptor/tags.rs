//! Descriptor tag enumeration.
//!
//! A descriptor is a table of 29 tagged segments. The tag numbers are part
//! of the wire format; the table in the descriptor header lists offsets in
//! exactly the order given by [`TAG_ORDER`].

/// Semantic segments of a device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Leading pulse pair emitted before the frame bits.
    BootCode = 1,
    /// Pulse pair for a zero bit.
    Zero = 2,
    /// Pulse pair for a one bit.
    One = 3,
    /// Extra pulses inserted after specific frame positions.
    DelayCode = 4,
    /// Declared frame length in bytes.
    FrameLength = 5,
    /// Bit order within each byte (0 = MSB first).
    Endian = 6,
    /// Whether the final bit is implied and needs no terminator mark.
    LastBit = 7,
    /// Byte-set write program for power on/off.
    Power1 = 21,
    /// Baseline command frame, before any field is applied.
    DefaultCode = 22,
    /// Byte-set temperature program (static table or per-step template).
    Temp1 = 23,
    /// Byte-set write program per operating mode.
    Mode1 = 24,
    /// Byte-set write program per fan speed.
    Speed1 = 25,
    /// Byte-set write program per swing position.
    Swing1 = 26,
    /// Checksum program list.
    Checksum = 27,
    /// Function codes that are sent standalone, outside state composition.
    SoloFunction = 28,
    /// Byte-set write program per function code.
    Function1 = 29,
    /// Bit-range temperature program.
    Temp2 = 30,
    /// Bit-range write program per operating mode.
    Mode2 = 31,
    /// Bit-range write program per fan speed.
    Speed2 = 32,
    /// Bit-range write program per swing position.
    Swing2 = 33,
    /// Bit-range write program per function code.
    Function2 = 34,
    /// Speed/temperature bans while in cool mode.
    BanCool = 41,
    /// Speed/temperature bans while in heat mode.
    BanHeat = 42,
    /// Speed/temperature bans while in auto mode.
    BanAuto = 43,
    /// Speed/temperature bans while in fan mode.
    BanFan = 44,
    /// Speed/temperature bans while in dry mode.
    BanDry = 45,
    /// Raw swing-support token.
    SwingInfo = 46,
    /// Number of times the assembled pulse train is emitted.
    RepeatTimes = 47,
    /// Per-byte bit-width overrides.
    BitNum = 48,
}

/// The fixed order in which tags appear in the descriptor's offset table.
pub const TAG_ORDER: [Tag; 29] = [
    Tag::BootCode,
    Tag::Zero,
    Tag::One,
    Tag::DelayCode,
    Tag::FrameLength,
    Tag::Endian,
    Tag::LastBit,
    Tag::Power1,
    Tag::DefaultCode,
    Tag::Temp1,
    Tag::Mode1,
    Tag::Speed1,
    Tag::Swing1,
    Tag::Checksum,
    Tag::SoloFunction,
    Tag::Function1,
    Tag::Temp2,
    Tag::Mode2,
    Tag::Speed2,
    Tag::Swing2,
    Tag::Function2,
    Tag::BanCool,
    Tag::BanHeat,
    Tag::BanAuto,
    Tag::BanFan,
    Tag::BanDry,
    Tag::SwingInfo,
    Tag::RepeatTimes,
    Tag::BitNum,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_table_is_complete() {
        assert_eq!(TAG_ORDER.len(), 29);
        // The ban tags sit in mode-ordinal order: cool, heat, auto, fan, dry.
        assert_eq!(TAG_ORDER[21], Tag::BanCool);
        assert_eq!(TAG_ORDER[25], Tag::BanDry);
    }
}
