//! Tick arithmetic
//!
//! A tick is one increment of the device's hardware timer. Ticks are only
//! ever compared through [`Width::elapsed`], which is modular in the clock
//! width, so wraparound is never a special case.

/// Tick count as carried on the wire
///
/// Narrow clocks only ever produce values up to `0xFFFF`.
pub type Tick = u32;

/// Timestamp width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    /// Raw 16-bit hardware counter
    Narrow,
    /// 16-bit counter extended by a software overflow count
    Wide,
}

impl Width {
    /// Number of timestamp bytes in a frame
    pub const fn timestamp_len(self) -> usize {
        match self {
            Width::Narrow => 2,
            Width::Wide => 4,
        }
    }

    /// Total encoded frame size in bytes
    pub const fn record_size(self) -> usize {
        // START + SEQ + timestamp + PINS + END
        4 + self.timestamp_len()
    }

    /// Largest tick value representable at this width
    pub const fn mask(self) -> Tick {
        match self {
            Width::Narrow => 0xFFFF,
            Width::Wide => 0xFFFF_FFFF,
        }
    }

    /// Ticks from `earlier` to `now`, modulo the clock width
    ///
    /// Correct across a single wrap of the counter.
    pub const fn elapsed(self, now: Tick, earlier: Tick) -> Tick {
        now.wrapping_sub(earlier) & self.mask()
    }
}
