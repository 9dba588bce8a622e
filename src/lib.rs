//! Seven-segment LED display driver
//!
//! Drives a single-digit seven-segment display whose segments are wired to
//! seven individual output lines (GPIO pins). The driver claims all seven lines
//! from a [`LineProvider`], renders digits by setting each line to the level
//! given by the segment table, remembers the last value shown and hands the
//! lines back on [`SevenSegment::shutdown`].
//!
//! ```rust, ignore
//! use sevenseg::{Digit, SevenSegment, Wiring};
//!
//! let mut display = SevenSegment::initialize(chip, Wiring::raspberry_pi())?;
//! display.show(Digit::new(7).unwrap())?;
//! assert_eq!(display.current().to_ascii(), b'7');
//! let chip = display.shutdown();
//! ```
//!
//! Use [`SharedDisplay`] when more than one context writes to the display.
#![no_std]

mod constants;
mod line;
pub mod request;
mod segment;
mod shared;

pub use constants::*;
pub use line::{LineProvider, Polarity, Wiring};
pub use request::{ParseError, Request};
pub use segment::{encode, Digit, DisplayValue, Level, SegmentPattern};
pub use shared::{InitError, SharedDisplay};

use embedded_hal::digital::ErrorType;
use heapless::Vec;
use line::drive_line;
use num_traits::ToPrimitive;

/// Error type of the output lines handed out by `P`.
pub type LineError<P> = <<P as LineProvider>::Line as ErrorType>::Error;

pub struct SevenSegment<P: LineProvider> {
    provider: P,
    lines: [P::Line; SEGMENT_COUNT],
    polarity: Polarity,
    current: DisplayValue,
}

impl<P: LineProvider> SevenSegment<P> {
    /// Claims every line in `wiring`, in order, driven to the blank level.
    ///
    /// If line `k` cannot be claimed, lines `0..k` are released and the
    /// provider is handed back with the error. No controller exists.
    pub fn initialize(
        mut provider: P,
        wiring: Wiring<P::Id>,
    ) -> Result<Self, WithProvider<P, AcquireError<P::Error>>> {
        let polarity = wiring.polarity;
        let mut staging = Staging {
            provider: &mut provider,
            lines: Vec::new(),
        };

        for (index, &id) in wiring.lines.iter().enumerate() {
            match staging.provider.acquire(id, polarity.pin_state(Level::Low)) {
                Ok(line) => {
                    if staging.lines.push(line).is_err() {
                        unreachable!("wiring holds exactly SEGMENT_COUNT lines");
                    }
                }
                Err(error) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("segment line {} unavailable, releasing {} staged", index, index);
                    drop(staging);
                    return Err(WithProvider {
                        provider,
                        error: AcquireError {
                            failed_index: index,
                            error,
                        },
                    });
                }
            }
        }

        let staged = core::mem::take(&mut staging.lines);
        drop(staging);
        let Ok(lines) = staged.into_array() else {
            unreachable!("wiring holds exactly SEGMENT_COUNT lines");
        };

        #[cfg(feature = "defmt")]
        defmt::info!("seven-segment display ready ({})", polarity);

        Ok(Self {
            provider,
            lines,
            polarity,
            current: DisplayValue::Blank,
        })
    }

    /// Blanks the display and returns every line to the provider.
    ///
    /// Lines are released even if blanking one of them fails; such failures
    /// are only reported through `defmt`. Call [`SevenSegment::clear`] first
    /// to observe them.
    pub fn shutdown(self) -> P {
        let Self {
            mut provider,
            lines,
            polarity,
            ..
        } = self;

        for (_index, mut line) in lines.into_iter().enumerate() {
            if drive_line(&mut line, polarity, Level::Low).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("segment line {} not blanked before release", _index);
            }
            provider.release(line);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("seven-segment display released");

        provider
    }

    pub fn show(&mut self, digit: Digit) -> Result<(), SevenSegError<LineError<P>>> {
        if let Err(error) = self.write_pattern(encode(digit)) {
            self.force_blank();
            return Err(SevenSegError::LineError(error));
        }
        self.current = DisplayValue::Digit(digit);
        Ok(())
    }

    /// Shows `value` if it is an integer in `0..=9`.
    ///
    /// Anything else (negative, too large, fractional) blanks the display and
    /// returns [`SevenSegError::OutOfRange`]. `-1` is not treated as clear.
    pub fn show_value<T>(&mut self, value: T) -> Result<(), SevenSegError<LineError<P>>>
    where
        T: ToPrimitive,
    {
        let digit = value
            .to_u8()
            .filter(|&whole| value.to_f64() == Some(f64::from(whole)))
            .and_then(Digit::new);

        match digit {
            Some(digit) => self.show(digit),
            None => self.reject(SevenSegError::OutOfRange(RangeError)),
        }
    }

    pub fn clear(&mut self) -> Result<(), SevenSegError<LineError<P>>> {
        if let Err(error) = self.write_pattern(SegmentPattern::BLANK) {
            self.force_blank();
            return Err(SevenSegError::LineError(error));
        }
        self.current = DisplayValue::Blank;
        Ok(())
    }

    /// Last value shown. The lines are not read back.
    pub fn current(&self) -> DisplayValue {
        self.current
    }

    /// Segment pattern of [`SevenSegment::current`]. After a line error a
    /// line that refused the write may still differ from it.
    pub fn pattern(&self) -> SegmentPattern {
        self.current.pattern()
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn apply(&mut self, request: Request) -> Result<(), SevenSegError<LineError<P>>> {
        match request {
            Request::Show(digit) => self.show(digit),
            Request::Clear => self.clear(),
        }
    }

    /// Applies a character-device write, see [`request::parse_char_payload`].
    pub fn write_char_payload(
        &mut self,
        payload: &[u8],
    ) -> Result<(), SevenSegError<LineError<P>>> {
        self.apply_parsed(request::parse_char_payload(payload))
    }

    /// Applies an attribute-file write, see [`request::parse_attribute_payload`].
    pub fn write_attribute_payload(
        &mut self,
        payload: &[u8],
    ) -> Result<(), SevenSegError<LineError<P>>> {
        self.apply_parsed(request::parse_attribute_payload(payload))
    }

    // Malformed payloads leave the display alone, payloads that name
    // something unshowable blank it.
    fn apply_parsed(
        &mut self,
        parsed: Result<Request, ParseError>,
    ) -> Result<(), SevenSegError<LineError<P>>> {
        match parsed {
            Ok(request) => self.apply(request),
            Err(ParseError::OutOfRange) => self.reject(SevenSegError::OutOfRange(RangeError)),
            Err(ParseError::TooLong) => {
                self.reject(SevenSegError::InvalidPayload(ParseError::TooLong))
            }
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("ignoring payload: {}", error);
                Err(SevenSegError::InvalidPayload(error))
            }
        }
    }

    fn reject(
        &mut self,
        error: SevenSegError<LineError<P>>,
    ) -> Result<(), SevenSegError<LineError<P>>> {
        #[cfg(feature = "defmt")]
        defmt::warn!("rejected display value, blanking");
        self.clear()?;
        Err(error)
    }

    fn write_pattern(&mut self, pattern: SegmentPattern) -> Result<(), LineError<P>> {
        for (line, level) in self.lines.iter_mut().zip(pattern.levels()) {
            drive_line(line, self.polarity, level)?;
        }
        Ok(())
    }

    // Best effort after a failed write: every line gets a blank attempt even
    // if an earlier one failed.
    fn force_blank(&mut self) {
        for line in self.lines.iter_mut() {
            let _ = drive_line(line, self.polarity, Level::Low);
        }
        self.current = DisplayValue::Blank;
    }
}

// Lines claimed so far during `initialize`. Dropping it hands them back,
// still at the blank level they were acquired with.
struct Staging<'a, P: LineProvider> {
    provider: &'a mut P,
    lines: Vec<P::Line, SEGMENT_COUNT>,
}

impl<P: LineProvider> Drop for Staging<'_, P> {
    fn drop(&mut self) {
        while let Some(line) = self.lines.pop() {
            self.provider.release(line);
        }
    }
}

/// Failed initialization. The provider is handed back so the caller can
/// retry with other wiring or reuse it elsewhere.
pub struct WithProvider<P, E> {
    pub provider: P,
    pub error: E,
}

impl<P, E> WithProvider<P, E> {
    pub fn into_parts(self) -> (P, E) {
        (self.provider, self.error)
    }
}

impl<P, E: core::fmt::Debug> core::fmt::Debug for WithProvider<P, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WithProvider")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<P, E: core::fmt::Display> core::fmt::Display for WithProvider<P, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.error.fmt(f)
    }
}

impl<P, E: core::fmt::Debug + core::fmt::Display> core::error::Error for WithProvider<P, E> {}

/// A value outside `0..=9` was given where a digit was expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeError;

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("digit out of range 0..=9")
    }
}

impl core::error::Error for RangeError {}

/// Line `failed_index` of the wiring could not be claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquireError<E> {
    pub failed_index: usize,
    pub error: E,
}

impl<E: core::fmt::Debug> core::fmt::Display for AcquireError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "cannot acquire segment line {}: {:?}",
            self.failed_index, self.error
        )
    }
}

impl<E: core::fmt::Debug> core::error::Error for AcquireError<E> {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SevenSegError<E> {
    LineError(E),
    OutOfRange(RangeError),
    InvalidPayload(ParseError),
    NotInitialized,
    UseAfterShutdown,
}

impl<E> From<E> for SevenSegError<E> {
    fn from(error: E) -> Self {
        SevenSegError::LineError(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for SevenSegError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SevenSegError::LineError(error) => write!(f, "output line error: {error:?}"),
            SevenSegError::OutOfRange(error) => write!(f, "{error}"),
            SevenSegError::InvalidPayload(error) => write!(f, "invalid payload: {error}"),
            SevenSegError::NotInitialized => f.write_str("display not initialized"),
            SevenSegError::UseAfterShutdown => f.write_str("display already shut down"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for SevenSegError<E> {}
