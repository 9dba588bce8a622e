//! Display shared between execution contexts.
//!
//! [`SharedDisplay`] serializes every write sequence behind a blocking mutex
//! so two digits never interleave their per-line writes, and keeps the value
//! shown in an atomic so readers do not contend with writers. It is meant to
//! live in a `static`:
//!
//! ```rust, ignore
//! static DISPLAY: SharedDisplay<CriticalSectionRawMutex, Chip> = SharedDisplay::new();
//!
//! DISPLAY.initialize(chip, Wiring::raspberry_pi())?;
//! DISPLAY.write_char_payload(b"4\n")?;
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::constants::BLANK_RAW;
use crate::line::{LineProvider, Wiring};
use crate::segment::{Digit, DisplayValue};
use crate::{AcquireError, LineError, Request, SevenSegError, SevenSegment, WithProvider};

enum Slot<P: LineProvider> {
    Uninitialized,
    Ready(SevenSegment<P>),
    Shutdown,
}

pub struct SharedDisplay<M: RawMutex, P: LineProvider> {
    slot: Mutex<M, RefCell<Slot<P>>>,
    shown: AtomicU8,
}

impl<M: RawMutex, P: LineProvider> SharedDisplay<M, P> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Slot::Uninitialized)),
            shown: AtomicU8::new(BLANK_RAW),
        }
    }

    /// Claims the lines, see [`SevenSegment::initialize`].
    ///
    /// A display can be initialized once. Initializing it again, or after
    /// shutdown, is a configuration error and leaves it untouched. On every
    /// error the provider comes back unused.
    pub fn initialize(
        &self,
        provider: P,
        wiring: Wiring<P::Id>,
    ) -> Result<(), WithProvider<P, InitError<P::Error>>> {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            let refused = match &*slot {
                Slot::Uninitialized => None,
                Slot::Ready(_) => Some(InitError::AlreadyInitialized),
                Slot::Shutdown => Some(InitError::UseAfterShutdown),
            };
            if let Some(error) = refused {
                return Err(WithProvider { provider, error });
            }

            let display = SevenSegment::initialize(provider, wiring).map_err(|failed| {
                WithProvider {
                    provider: failed.provider,
                    error: InitError::Acquire(failed.error),
                }
            })?;
            self.shown.store(BLANK_RAW, Ordering::Release);
            *slot = Slot::Ready(display);
            Ok(())
        })
    }

    pub fn show(&self, digit: Digit) -> Result<(), SevenSegError<LineError<P>>> {
        self.with_display(|display| display.show(digit))
    }

    pub fn show_value<T: num_traits::ToPrimitive>(
        &self,
        value: T,
    ) -> Result<(), SevenSegError<LineError<P>>> {
        self.with_display(|display| display.show_value(value))
    }

    pub fn clear(&self) -> Result<(), SevenSegError<LineError<P>>> {
        self.with_display(SevenSegment::clear)
    }

    pub fn apply(&self, request: Request) -> Result<(), SevenSegError<LineError<P>>> {
        self.with_display(|display| display.apply(request))
    }

    pub fn write_char_payload(&self, payload: &[u8]) -> Result<(), SevenSegError<LineError<P>>> {
        self.with_display(|display| display.write_char_payload(payload))
    }

    pub fn write_attribute_payload(
        &self,
        payload: &[u8],
    ) -> Result<(), SevenSegError<LineError<P>>> {
        self.with_display(|display| display.write_attribute_payload(payload))
    }

    /// Value shown, read without taking the lock. Blank before initialization
    /// and after shutdown.
    pub fn current(&self) -> DisplayValue {
        match self.shown.load(Ordering::Acquire) {
            BLANK_RAW => DisplayValue::Blank,
            raw => Digit::new(raw).into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.slot
            .lock(|slot| matches!(*slot.borrow(), Slot::Ready(_)))
    }

    /// Blanks and releases the lines, handing back the provider. Every later
    /// operation fails with [`SevenSegError::UseAfterShutdown`].
    pub fn shutdown(&self) -> Result<P, SevenSegError<LineError<P>>> {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            match core::mem::replace(&mut *slot, Slot::Shutdown) {
                Slot::Ready(display) => {
                    self.shown.store(BLANK_RAW, Ordering::Release);
                    Ok(display.shutdown())
                }
                Slot::Uninitialized => {
                    *slot = Slot::Uninitialized;
                    Err(SevenSegError::NotInitialized)
                }
                Slot::Shutdown => Err(SevenSegError::UseAfterShutdown),
            }
        })
    }

    fn with_display<R>(
        &self,
        f: impl FnOnce(&mut SevenSegment<P>) -> Result<R, SevenSegError<LineError<P>>>,
    ) -> Result<R, SevenSegError<LineError<P>>> {
        self.slot.lock(|slot| match &mut *slot.borrow_mut() {
            Slot::Ready(display) => {
                let result = f(display);
                self.shown.store(raw_value(display.current()), Ordering::Release);
                result
            }
            Slot::Uninitialized => Err(SevenSegError::NotInitialized),
            Slot::Shutdown => Err(SevenSegError::UseAfterShutdown),
        })
    }
}

impl<M: RawMutex, P: LineProvider> Default for SharedDisplay<M, P> {
    fn default() -> Self {
        Self::new()
    }
}

fn raw_value(value: DisplayValue) -> u8 {
    match value {
        DisplayValue::Blank => BLANK_RAW,
        DisplayValue::Digit(digit) => digit.value(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    Acquire(AcquireError<E>),
    AlreadyInitialized,
    UseAfterShutdown,
}

impl<E: core::fmt::Debug> core::fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::Acquire(error) => write!(f, "{error}"),
            InitError::AlreadyInitialized => f.write_str("display already initialized"),
            InitError::UseAfterShutdown => f.write_str("display already shut down"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for InitError<E> {}
