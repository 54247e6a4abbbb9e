use std::ops::RangeInclusive;

/// Highest MIDI key or velocity value.
pub const MAX_VALUE: u8 = 127;

/// An inclusive key or velocity range as stored in SF2 range generators.
///
/// A `high` bound of 0 is a sentinel for "unspecified": it is what a missing
/// generator decodes to, and it is treated as reaching up to 127.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Range {
    pub low: u8,
    pub high: u8,
}

impl Range {
    pub const UNBOUNDED: Range = Range { low: 0, high: 0 };

    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    /// Decodes a packed range generator (`low | high << 8`).
    pub fn from_packed(value: u16) -> Self {
        Self {
            low: (value & 0xFF) as u8,
            high: ((value >> 8) & 0xFF) as u8,
        }
    }

    pub fn to_packed(self) -> u16 {
        ((self.high as u16) << 8) | self.low as u16
    }

    pub fn is_unbounded(&self) -> bool {
        self.high == 0
    }

    /// The upper bound used when filling tables: `high`, or 127 when unbounded.
    pub fn effective_high(&self) -> u8 {
        if self.is_unbounded() {
            MAX_VALUE
        } else {
            self.high.min(MAX_VALUE)
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        self.as_inclusive().contains(&value)
    }

    pub fn as_inclusive(&self) -> RangeInclusive<u8> {
        self.low..=self.effective_high()
    }
}

impl From<u16> for Range {
    fn from(value: u16) -> Self {
        Range::from_packed(value)
    }
}
