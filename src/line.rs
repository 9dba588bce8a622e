//! Output lines and the platform that hands them out.

use embedded_hal::digital::{OutputPin, PinState};

use crate::constants::{RPI_SEGMENT_LINES, SEGMENT_COUNT};
use crate::segment::Level;

/// Source of output lines, one per configured physical identifier.
///
/// On Linux this is typically a GPIO character device chip, on a
/// microcontroller a pin bank. Implementations must hand each identifier out
/// at most once until it is released.
pub trait LineProvider {
    type Id: Copy;
    type Line: OutputPin;
    type Error;

    /// Claims `id` as an output already driven to `initial`.
    fn acquire(&mut self, id: Self::Id, initial: PinState)
        -> Result<Self::Line, Self::Error>;

    /// Returns a line previously obtained from [`LineProvider::acquire`].
    fn release(&mut self, line: Self::Line);
}

/// How a logical level maps onto the pin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pin high lights the segment (common cathode).
    #[default]
    ActiveHigh,
    /// Pin low lights the segment (common anode).
    ActiveLow,
}

impl Polarity {
    pub const fn pin_state(self, level: Level) -> PinState {
        match (self, level) {
            (Polarity::ActiveHigh, Level::High) | (Polarity::ActiveLow, Level::Low) => {
                PinState::High
            }
            (Polarity::ActiveHigh, Level::Low) | (Polarity::ActiveLow, Level::High) => {
                PinState::Low
            }
        }
    }
}

/// Which physical lines drive the segments, in pattern index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wiring<Id> {
    pub lines: [Id; SEGMENT_COUNT],
    pub polarity: Polarity,
}

impl<Id> Wiring<Id> {
    pub const fn new(lines: [Id; SEGMENT_COUNT]) -> Self {
        Self {
            lines,
            polarity: Polarity::ActiveHigh,
        }
    }

    pub const fn active_low(lines: [Id; SEGMENT_COUNT]) -> Self {
        Self {
            lines,
            polarity: Polarity::ActiveLow,
        }
    }
}

impl Wiring<u32> {
    pub const fn raspberry_pi() -> Self {
        Self::new(RPI_SEGMENT_LINES)
    }
}

pub(crate) fn drive_line<L: OutputPin>(
    line: &mut L,
    polarity: Polarity,
    level: Level,
) -> Result<(), L::Error> {
    line.set_state(polarity.pin_state(level))
}
