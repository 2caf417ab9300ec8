//! Sequence counter continuity
//!
//! The device increments an 8-bit counter for every frame it commits and
//! restarts it at 0 each time its buffer is flushed. The host compares each
//! decoded counter against the value it expected next. A mismatch means
//! frames were lost in transit; nothing is reconstructed, the mismatch is
//! only reported.

/// Result of comparing a decoded counter with the expected one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Continuity {
    /// First frame seen since the tracker was created or reset
    First,
    /// Counter matched the expected value
    InSequence,
    /// Counter restarted at 0, the device flushed its buffer
    BatchStart,
    /// Counter skipped ahead (or moved backwards)
    Gap {
        /// Counter the tracker expected
        expected: u8,
        /// Counter actually decoded
        observed: u8,
    },
}

impl Continuity {
    /// Number of frames presumed lost, 0 unless this is a gap
    pub fn missing(&self) -> u8 {
        match *self {
            Continuity::Gap { expected, observed } => observed.wrapping_sub(expected),
            _ => 0,
        }
    }
}

/// Hook notified when the sequence counter jumps
///
/// What to do about a gap is up to the host: count it, log it, or ignore it.
pub trait SequenceObserver {
    /// Called once per detected discontinuity
    fn on_gap(&mut self, expected: u8, observed: u8);
}

impl<T: SequenceObserver + ?Sized> SequenceObserver for &mut T {
    fn on_gap(&mut self, expected: u8, observed: u8) {
        (**self).on_gap(expected, observed)
    }
}

/// Observer that ignores gaps
impl SequenceObserver for () {
    fn on_gap(&mut self, _expected: u8, _observed: u8) {}
}

/// Observer that tallies gaps and presumed lost frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GapCounter {
    /// Number of discontinuities seen
    pub gaps: u32,
    /// Sum of frames presumed lost across all gaps
    pub missing_frames: u32,
}

impl SequenceObserver for GapCounter {
    fn on_gap(&mut self, expected: u8, observed: u8) {
        self.gaps = self.gaps.saturating_add(1);
        self.missing_frames = self
            .missing_frames
            .saturating_add(observed.wrapping_sub(expected) as u32);
    }
}

/// Running expectation of the next sequence counter
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceTracker {
    expected: Option<u8>,
}

impl SequenceTracker {
    /// Create a tracker with no expectation yet
    pub const fn new() -> Self {
        Self { expected: None }
    }

    /// Forget the expected value
    ///
    /// The next frame is classified as [`Continuity::First`].
    pub fn reset(&mut self) {
        self.expected = None;
    }

    /// Counter expected next, if any frame has been seen
    pub fn expected(&self) -> Option<u8> {
        self.expected
    }

    /// Classify `counter` and advance the expectation past it
    pub fn observe(&mut self, counter: u8) -> Continuity {
        let continuity = match self.expected {
            None => Continuity::First,
            Some(expected) if expected == counter => Continuity::InSequence,
            Some(_) if counter == 0 => Continuity::BatchStart,
            Some(expected) => Continuity::Gap {
                expected,
                observed: counter,
            },
        };
        self.expected = Some(counter.wrapping_add(1));
        continuity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_counters() {
        let mut tracker = SequenceTracker::new();
        assert_eq!(tracker.observe(0), Continuity::First);
        assert_eq!(tracker.observe(1), Continuity::InSequence);
        assert_eq!(tracker.observe(2), Continuity::InSequence);
        assert_eq!(tracker.expected(), Some(3));
    }

    #[test]
    fn test_gap_detected() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(0);
        tracker.observe(1);

        let continuity = tracker.observe(3);
        assert_eq!(
            continuity,
            Continuity::Gap {
                expected: 2,
                observed: 3
            }
        );
        assert_eq!(continuity.missing(), 1);

        // Tracking resumes from the observed value
        assert_eq!(tracker.observe(4), Continuity::InSequence);
    }

    #[test]
    fn test_counter_wraps() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(254);
        assert_eq!(tracker.observe(255), Continuity::InSequence);
        assert_eq!(tracker.observe(0), Continuity::InSequence);
    }

    #[test]
    fn test_restart_at_zero_is_batch_start() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(0);
        tracker.observe(1);
        tracker.observe(2);
        assert_eq!(tracker.observe(0), Continuity::BatchStart);
        assert_eq!(tracker.observe(1), Continuity::InSequence);
    }

    #[test]
    fn test_reset_forgets_expectation() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(10);
        tracker.reset();
        assert_eq!(tracker.observe(42), Continuity::First);
    }

    #[test]
    fn test_gap_counter_accumulates() {
        let mut counter = GapCounter::default();
        counter.on_gap(2, 3);
        counter.on_gap(250, 4);

        assert_eq!(counter.gaps, 2);
        assert_eq!(counter.missing_frames, 1 + 10);
    }
}
