//! Payload grammar shared by the character-device and attribute-file adapters.
//!
//! Adapters hand the raw bytes of a write here and apply the resulting
//! [`Request`]; reads format [`crate::DisplayValue`] with [`format_current`].

use crate::segment::{Digit, DisplayValue};

/// Action requested by a presentation adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    Show(Digit),
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Nothing left after the line terminator was removed.
    Empty,
    /// More than one character for the character-device surface.
    TooLong,
    NotANumber,
    OutOfRange,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty payload"),
            ParseError::TooLong => f.write_str("payload longer than one character"),
            ParseError::NotANumber => f.write_str("payload is not a decimal number"),
            ParseError::OutOfRange => f.write_str("digit out of range 0..=9"),
        }
    }
}

impl core::error::Error for ParseError {}

/// Parses a character-device write: one ASCII digit, optionally followed by
/// a newline.
///
/// A [`ParseError::TooLong`] result obliges the caller to blank the display.
pub fn parse_char_payload(payload: &[u8]) -> Result<Request, ParseError> {
    let payload = payload.strip_suffix(b"\n").unwrap_or(payload);
    match payload {
        [] => Err(ParseError::Empty),
        [byte] => Digit::from_ascii(*byte)
            .map(Request::Show)
            .ok_or(ParseError::OutOfRange),
        _ => Err(ParseError::TooLong),
    }
}

/// Parses an attribute-file write: a signed decimal integer, optionally
/// followed by a single newline. Any other whitespace is rejected. `-1`
/// requests a blank display.
pub fn parse_attribute_payload(payload: &[u8]) -> Result<Request, ParseError> {
    let payload = payload.strip_suffix(b"\n").unwrap_or(payload);
    let text = core::str::from_utf8(payload).map_err(|_| ParseError::NotANumber)?;
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: i32 = match text.parse() {
        Ok(value) => value,
        // digits only, just too wide for i32
        Err(_) if is_integer_literal(text) => return Err(ParseError::OutOfRange),
        Err(_) => return Err(ParseError::NotANumber),
    };

    match value {
        -1 => Ok(Request::Clear),
        _ => Digit::try_from(value)
            .map(Request::Show)
            .map_err(|_| ParseError::OutOfRange),
    }
}

/// Character returned to a reader for the value currently shown.
pub const fn format_current(value: DisplayValue) -> u8 {
    value.to_ascii()
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(value: u8) -> Request {
        Request::Show(Digit::new(value).unwrap())
    }

    #[test]
    fn test_char_payload() {
        assert_eq!(parse_char_payload(b"7"), Ok(show(7)));
        assert_eq!(parse_char_payload(b"0\n"), Ok(show(0)));
        assert_eq!(parse_char_payload(b""), Err(ParseError::Empty));
        assert_eq!(parse_char_payload(b"\n"), Err(ParseError::Empty));
        assert_eq!(parse_char_payload(b"12"), Err(ParseError::TooLong));
        assert_eq!(parse_char_payload(b"5\n\n"), Err(ParseError::TooLong));
        assert_eq!(parse_char_payload(b"a"), Err(ParseError::OutOfRange));
        assert_eq!(parse_char_payload(b"/"), Err(ParseError::OutOfRange));
    }

    #[test]
    fn test_attribute_payload() {
        assert_eq!(parse_attribute_payload(b"3\n"), Ok(show(3)));
        assert_eq!(parse_attribute_payload(b"9"), Ok(show(9)));
        assert_eq!(parse_attribute_payload(b"  9 "), Err(ParseError::NotANumber));
        assert_eq!(parse_attribute_payload(b"9 \n"), Err(ParseError::NotANumber));
        assert_eq!(parse_attribute_payload(b"9\n\n"), Err(ParseError::NotANumber));
        assert_eq!(parse_attribute_payload(b"+4"), Ok(show(4)));
        assert_eq!(parse_attribute_payload(b"-1\n"), Ok(Request::Clear));
        assert_eq!(parse_attribute_payload(b"10"), Err(ParseError::OutOfRange));
        assert_eq!(parse_attribute_payload(b"-2"), Err(ParseError::OutOfRange));
        assert_eq!(
            parse_attribute_payload(b"99999999999"),
            Err(ParseError::OutOfRange)
        );
        assert_eq!(parse_attribute_payload(b"seven"), Err(ParseError::NotANumber));
        assert_eq!(parse_attribute_payload(b"\xff"), Err(ParseError::NotANumber));
        assert_eq!(parse_attribute_payload(b"\n"), Err(ParseError::Empty));
        assert_eq!(parse_attribute_payload(b" \n"), Err(ParseError::NotANumber));
    }

    #[test]
    fn test_format_current() {
        assert_eq!(format_current(DisplayValue::Blank), b'-');
        for digit in Digit::ALL {
            assert_eq!(format_current(digit.into()), b'0' + digit.value());
        }
    }
}
