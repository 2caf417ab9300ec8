//! Monotonic tick clocks
//!
//! Two variants over the same 16-bit hardware counter:
//!
//! - [`NarrowClock`] returns the counter as is and wraps every 65536 ticks.
//! - [`WideClock`] extends it to 32 bits with an overflow count that the
//!   counter's wrap interrupt increments.
//!
//! Neither clock is ever reset. Consumers compare ticks with
//! [`Width::elapsed`], which is wraparound-safe.

use core::cell::Cell;

use chadilat_hal::HardwareCounter;
use chadilat_protocol::{Tick, Width};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Half of the counter range; a low word below this was read after a wrap
const WRAP_HALF: u16 = 0x8000;

/// Source of timestamps
pub trait Clock {
    /// Width of the values returned by [`now`](Self::now)
    fn width(&self) -> Width;

    /// Current tick count
    fn now(&self) -> Tick;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn width(&self) -> Width {
        (**self).width()
    }

    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// 16-bit clock read straight from the hardware counter
pub struct NarrowClock<C> {
    counter: C,
}

impl<C: HardwareCounter> NarrowClock<C> {
    /// Create a clock over `counter`
    pub const fn new(counter: C) -> Self {
        Self { counter }
    }

    /// Underlying hardware counter
    pub fn counter(&self) -> &C {
        &self.counter
    }
}

impl<C: HardwareCounter> Clock for NarrowClock<C> {
    fn width(&self) -> Width {
        Width::Narrow
    }

    fn now(&self) -> Tick {
        self.counter.count() as Tick
    }
}

/// 32-bit clock: software overflow count in the high half, hardware
/// counter in the low half
///
/// The overflow count is shared with the wrap interrupt. Every access goes
/// through a critical-section mutex, and [`now`](Clock::now) reads both
/// halves inside a single critical section so the interrupt cannot land
/// between them.
///
/// The hardware can still wrap while interrupts are masked. In that case
/// the handler has not run yet, but the counter reports a pending
/// overflow, and a low word from the lower half of the range must belong
/// to the next epoch. Without that correction a read right at the boundary
/// would pair the old high word with the new low word and jump back by
/// 65536 ticks.
pub struct WideClock<C> {
    counter: C,
    overflows: Mutex<CriticalSectionRawMutex, Cell<u16>>,
}

impl<C: HardwareCounter> WideClock<C> {
    /// Create a clock over `counter`, starting at overflow count 0
    ///
    /// `const` so the clock can live in a `static` shared with the
    /// interrupt handler.
    pub const fn new(counter: C) -> Self {
        Self {
            counter,
            overflows: Mutex::new(Cell::new(0)),
        }
    }

    /// Overflow interrupt body
    ///
    /// Must be called exactly once per hardware wrap, after the
    /// interrupt flag has been cleared.
    pub fn on_overflow(&self) {
        self.overflows.lock(|overflows| overflows.set(overflows.get().wrapping_add(1)));
    }

    /// Underlying hardware counter, for the interrupt handler to acknowledge
    /// the wrap
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Number of wraps counted so far (modulo 2^16)
    pub fn overflows(&self) -> u16 {
        self.overflows.lock(Cell::get)
    }
}

impl<C: HardwareCounter> Clock for WideClock<C> {
    fn width(&self) -> Width {
        Width::Wide
    }

    fn now(&self) -> Tick {
        self.overflows.lock(|overflows| {
            let mut high = overflows.get();
            let low = self.counter.count();
            if self.counter.overflow_pending() && low < WRAP_HALF {
                high = high.wrapping_add(1);
            }
            ((high as Tick) << 16) | low as Tick
        })
    }
}
