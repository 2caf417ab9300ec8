//! Host-side stream synchronizer
//!
//! Bytes arrive in arbitrary chunks with no framing beyond the markers. The
//! decoder keeps the not-yet-decoded tail in a bounded window and applies
//! these rules until it runs out of bytes:
//!
//! 1. Drop leading bytes one at a time until the window starts with START.
//! 2. With less than one frame buffered, wait for more input.
//! 3. If the byte where END should be is something else, the START was
//!    probably data. Drop exactly that one byte and go back to 1.
//! 4. Otherwise decode the frame and remove it from the window.
//!
//! Recovery after garbage therefore costs one discard per garbage byte and
//! never skips over a real frame boundary.

use heapless::Deque;

use crate::config::WINDOW_CAPACITY;
use crate::frame::{Record, END_MARKER, MAX_RECORD_SIZE, START_MARKER};
use crate::sequence::{Continuity, GapCounter, SequenceObserver, SequenceTracker};
use crate::tick::Width;

/// Decoder counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Frames decoded and handed out
    pub frames: u64,
    /// Bytes dropped while resynchronizing
    pub discarded_bytes: u64,
    /// Candidates that started with START but lacked END
    pub malformed: u64,
}

/// Byte stream to [`Record`] decoder with a window of `N` bytes
pub struct StreamDecoder<O = GapCounter, const N: usize = WINDOW_CAPACITY> {
    width: Width,
    window: Deque<u8, N>,
    tracker: SequenceTracker,
    observer: O,
    last_continuity: Option<Continuity>,
    stats: DecoderStats,
}

impl StreamDecoder {
    /// Create a decoder that tallies sequence gaps in a [`GapCounter`]
    pub fn new(width: Width) -> Self {
        Self::with_window(width, GapCounter::default())
    }
}

impl<O: SequenceObserver> StreamDecoder<O> {
    /// Create a decoder reporting sequence gaps to `observer`
    pub fn with_observer(width: Width, observer: O) -> Self {
        Self::with_window(width, observer)
    }
}

impl<O: SequenceObserver, const N: usize> StreamDecoder<O, N> {
    /// A window smaller than one frame could never decode anything
    const WINDOW_FITS_FRAME: () = assert!(N >= MAX_RECORD_SIZE, "window smaller than a frame");

    /// Create a decoder with an explicit window size
    pub fn with_window(width: Width, observer: O) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WINDOW_FITS_FRAME;

        Self {
            width,
            window: Deque::new(),
            tracker: SequenceTracker::new(),
            observer,
            last_continuity: None,
            stats: DecoderStats::default(),
        }
    }

    /// Timestamp width this decoder expects
    pub fn width(&self) -> Width {
        self.width
    }

    /// Bytes currently buffered
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if no bytes are buffered
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Room left in the window
    ///
    /// Reading at most this many bytes per chunk guarantees [`extend`]
    /// accepts all of them.
    ///
    /// [`extend`]: Self::extend
    pub fn spare_capacity(&self) -> usize {
        N - self.window.len()
    }

    /// Append received bytes to the window
    ///
    /// Returns how many bytes were accepted; bytes beyond the window
    /// capacity are not stored.
    pub fn extend(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if self.window.push_back(byte).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Decode the next frame, if the window holds one
    ///
    /// Returns `None` once the window needs more input. Resync discards
    /// made along the way are counted in [`stats`](Self::stats).
    pub fn next_record(&mut self) -> Option<Record> {
        let size = self.width.record_size();

        loop {
            self.discard_until_start();

            if self.window.len() < size {
                return None;
            }

            if self.window.iter().nth(size - 1) != Some(&END_MARKER) {
                // START was incidental data; rescan from the next byte
                self.window.pop_front();
                self.stats.discarded_bytes += 1;
                self.stats.malformed += 1;
                continue;
            }

            let mut frame = [0u8; MAX_RECORD_SIZE];
            for slot in frame.iter_mut().take(size) {
                // len >= size was checked above
                *slot = self.window.pop_front().unwrap_or_default();
            }

            let Ok(record) = Record::decode(&frame[..size], self.width) else {
                continue;
            };

            let continuity = self.tracker.observe(record.counter);
            if let Continuity::Gap { expected, observed } = continuity {
                self.observer.on_gap(expected, observed);
            }
            self.last_continuity = Some(continuity);
            self.stats.frames += 1;

            return Some(record);
        }
    }

    /// Iterate over every frame currently decodable
    pub fn records(&mut self) -> Records<'_, O, N> {
        Records { decoder: self }
    }

    /// Drop all buffered bytes and the sequence expectation
    ///
    /// Used after an unrecoverable read error. Decoding resumes cleanly from
    /// whatever byte arrives next.
    pub fn reset(&mut self) {
        self.stats.discarded_bytes += self.window.len() as u64;
        self.window.clear();
        self.tracker.reset();
        self.last_continuity = None;
    }

    /// Continuity of the most recently decoded frame
    pub fn last_continuity(&self) -> Option<Continuity> {
        self.last_continuity
    }

    /// Decoder counters
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Sequence gap observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Sequence gap observer, mutably
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn discard_until_start(&mut self) {
        while let Some(&byte) = self.window.front() {
            if byte == START_MARKER {
                break;
            }
            self.window.pop_front();
            self.stats.discarded_bytes += 1;
        }
    }
}

/// Iterator returned by [`StreamDecoder::records`]
pub struct Records<'a, O, const N: usize> {
    decoder: &'a mut StreamDecoder<O, N>,
}

impl<O: SequenceObserver, const N: usize> Iterator for Records<'_, O, N> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.decoder.next_record()
    }
}
