//! Free-running hardware timer abstraction

/// A 16-bit hardware counter that increments once per tick and wraps to 0
///
/// The counter is read from interrupt-free context by the wide clock, so
/// implementations must not block.
pub trait HardwareCounter {
    /// Current counter value
    fn count(&self) -> u16;

    /// Check if the counter has wrapped since the overflow handler last ran
    ///
    /// Counters that never raise an overflow interrupt can keep the
    /// default. Wide clocks use this to detect a wrap that happened while
    /// interrupts were masked.
    fn overflow_pending(&self) -> bool {
        false
    }
}

impl<T: HardwareCounter + ?Sized> HardwareCounter for &T {
    fn count(&self) -> u16 {
        (**self).count()
    }

    fn overflow_pending(&self) -> bool {
        (**self).overflow_pending()
    }
}
