//! Digit values and the segment patterns that render them.

use crate::constants::{BLANK_CHAR, DIGIT_COUNT, SEGMENT_COUNT, SEGMENT_TABLE};
use crate::RangeError;

/// A decimal digit that the display can render, always in `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    pub const MIN: Digit = Digit(0);
    pub const MAX: Digit = Digit(9);

    /// Every renderable digit, in ascending order.
    pub const ALL: [Digit; DIGIT_COUNT] = [
        Digit(0),
        Digit(1),
        Digit(2),
        Digit(3),
        Digit(4),
        Digit(5),
        Digit(6),
        Digit(7),
        Digit(8),
        Digit(9),
    ];

    pub const fn new(value: u8) -> Option<Self> {
        if (value as usize) < DIGIT_COUNT {
            Some(Digit(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn to_ascii(self) -> u8 {
        b'0' + self.0
    }

    /// Parses a single ASCII decimal character.
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'0'..=b'9' => Some(Digit(byte - b'0')),
            _ => None,
        }
    }
}

impl TryFrom<i32> for Digit {
    type Error = RangeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Digit::new)
            .ok_or(RangeError)
    }
}

/// What the display is currently showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayValue {
    /// No segment lit. Distinct from digit 0.
    #[default]
    Blank,
    Digit(Digit),
}

impl DisplayValue {
    /// Single character representation used by the read side of adapters:
    /// `'0'..='9'` for digits, [`BLANK_CHAR`] for blank.
    pub const fn to_ascii(self) -> u8 {
        match self {
            DisplayValue::Blank => BLANK_CHAR,
            DisplayValue::Digit(digit) => digit.to_ascii(),
        }
    }

    /// The pattern the output lines must hold while this value is shown.
    pub const fn pattern(self) -> SegmentPattern {
        match self {
            DisplayValue::Blank => SegmentPattern::BLANK,
            DisplayValue::Digit(digit) => encode(digit),
        }
    }
}

impl From<Digit> for DisplayValue {
    fn from(digit: Digit) -> Self {
        DisplayValue::Digit(digit)
    }
}

impl From<Option<Digit>> for DisplayValue {
    fn from(digit: Option<Digit>) -> Self {
        match digit {
            Some(digit) => DisplayValue::Digit(digit),
            None => DisplayValue::Blank,
        }
    }
}

/// Logical drive state of an output line. `High` lights the attached segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    #[default]
    Low,
    High,
}

impl From<bool> for Level {
    fn from(lit: bool) -> Self {
        if lit {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Activation flags for the seven output lines. Index `i` always belongs to
/// output line `i` of the wiring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPattern([bool; SEGMENT_COUNT]);

impl SegmentPattern {
    pub const BLANK: SegmentPattern = SegmentPattern([false; SEGMENT_COUNT]);

    /// Builds a pattern from a mask where bit `i` is line `i`. Bit 7 is ignored.
    pub const fn from_bits(bits: u8) -> Self {
        let mut segments = [false; SEGMENT_COUNT];
        let mut i = 0;
        while i < SEGMENT_COUNT {
            segments[i] = bits & (1 << i) != 0;
            i += 1;
        }
        Self(segments)
    }

    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        let mut i = 0;
        while i < SEGMENT_COUNT {
            if self.0[i] {
                bits |= 1 << i;
            }
            i += 1;
        }
        bits
    }

    /// Returns false for indexes past the last segment.
    pub const fn is_lit(&self, index: usize) -> bool {
        index < SEGMENT_COUNT && self.0[index]
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.0.iter().map(|&lit| Level::from(lit))
    }
}

/// Looks up the segment pattern for `digit`. Blank never goes through here;
/// callers use [`SegmentPattern::BLANK`].
pub const fn encode(digit: Digit) -> SegmentPattern {
    let row = &SEGMENT_TABLE[digit.0 as usize];
    let mut segments = [false; SEGMENT_COUNT];
    let mut i = 0;
    while i < SEGMENT_COUNT {
        segments[i] = row[i] != 0;
        i += 1;
    }
    SegmentPattern(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_range() {
        assert_eq!(Digit::new(9), Some(Digit::MAX));
        assert_eq!(Digit::new(10), None);
        assert_eq!(Digit::try_from(-1i32), Err(RangeError));
        assert_eq!(Digit::try_from(300i32), Err(RangeError));
        assert_eq!(Digit::try_from(0i32), Ok(Digit::MIN));
        assert_eq!(Digit::from_ascii(b'7').map(Digit::value), Some(7));
        assert_eq!(Digit::from_ascii(b':'), None);
    }

    #[test]
    fn test_encode_table() {
        // digit 1 lights lines 3 and 6 on this wiring
        assert_eq!(encode(Digit(1)).bits(), 0b100_1000);
        assert_eq!(encode(Digit(8)).bits(), 0b111_1111);
        for digit in Digit::ALL {
            let pattern = encode(digit);
            for (i, &lit) in SEGMENT_TABLE[digit.value() as usize].iter().enumerate() {
                assert_eq!(pattern.is_lit(i), lit == 1);
            }
            assert_eq!(SegmentPattern::from_bits(pattern.bits()), pattern);
        }
        assert!(!encode(Digit(8)).is_lit(SEGMENT_COUNT));
    }

    #[test]
    fn test_blank_pattern() {
        assert_eq!(DisplayValue::Blank.pattern(), SegmentPattern::BLANK);
        assert_eq!(SegmentPattern::BLANK.bits(), 0);
        assert!(SegmentPattern::BLANK.levels().all(|level| level == Level::Low));
        assert_eq!(DisplayValue::from(None::<Digit>).to_ascii(), BLANK_CHAR);
    }
}
