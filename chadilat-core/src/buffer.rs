//! Device frame buffer
//!
//! Frames are appended whole into a fixed byte region that holds
//! [`BUFFER_RECORDS`] frames. When the region cannot take another frame the
//! write is refused, the overflow indicator lights up, and the caller is
//! expected to [`flush`](FrameBuffer::flush) and retry. Flushing waits for
//! the host, sends everything in one transfer, and starts over.
//!
//! The sequence counter lives here because it restarts with every flush.

use chadilat_hal::{OutputPin, TransportSink};
use chadilat_protocol::{PinState, Record, Tick, Width, BUFFER_RECORDS, MAX_RECORD_SIZE};
use heapless::Vec;

/// Backing storage in bytes, sized for the widest frame
const STORAGE_BYTES: usize = BUFFER_RECORDS * MAX_RECORD_SIZE;

/// A write was refused because no room is left for a whole frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferFull;

/// Buffer activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferStats {
    /// Frames committed since start-up
    pub frames: u32,
    /// Non-empty flushes
    pub flushes: u32,
    /// Writes refused with [`BufferFull`]
    pub overflows: u32,
}

/// Bounded buffer of encoded frames in front of a flow-controlled sink
pub struct FrameBuffer<S, L> {
    width: Width,
    bytes: Vec<u8, STORAGE_BYTES>,
    counter: u8,
    sink: S,
    indicator: L,
    stats: BufferStats,
}

impl<S, L> FrameBuffer<S, L>
where
    S: TransportSink,
    L: OutputPin,
{
    /// Create an empty buffer
    pub fn new(width: Width, sink: S, mut indicator: L) -> Self {
        indicator.set_low();
        Self {
            width,
            bytes: Vec::new(),
            counter: 0,
            sink,
            indicator,
            stats: BufferStats::default(),
        }
    }

    /// Frame width
    pub fn width(&self) -> Width {
        self.width
    }

    /// Capacity in bytes for the configured width
    pub fn capacity(&self) -> usize {
        BUFFER_RECORDS * self.width.record_size()
    }

    /// Number of frames currently buffered
    pub fn len(&self) -> usize {
        self.bytes.len() / self.width.record_size()
    }

    /// Check if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Buffered bytes, oldest first
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Append one frame
    ///
    /// The frame takes the next sequence number. On [`BufferFull`] nothing
    /// is written and the sequence number is not consumed.
    pub fn write(&mut self, timestamp: Tick, pins: PinState) -> Result<(), BufferFull> {
        let size = self.width.record_size();
        if self.bytes.len() + size > self.capacity() {
            self.indicator.set_high();
            self.stats.overflows = self.stats.overflows.saturating_add(1);
            return Err(BufferFull);
        }

        let encoded = Record::new(self.counter, timestamp, pins).encode(self.width);
        self.bytes
            .extend_from_slice(&encoded)
            .map_err(|_| BufferFull)?;

        self.counter = self.counter.wrapping_add(1);
        self.stats.frames = self.stats.frames.saturating_add(1);
        Ok(())
    }

    /// Send all buffered frames to the host
    ///
    /// Does nothing if the buffer is empty. Otherwise spins until the sink
    /// reports the host ready, so sampling stops while the host is away.
    /// The buffer is reset even if the transfer fails; the host notices the
    /// loss through the sequence counter.
    pub fn flush(&mut self) -> Result<(), S::Error> {
        if self.bytes.is_empty() {
            return Ok(());
        }

        while !self.sink.is_ready() {
            core::hint::spin_loop();
        }

        let result = self.sink.write_all(&self.bytes);
        self.stats.flushes = self.stats.flushes.saturating_add(1);
        self.reset();
        result
    }

    /// Forget all buffered frames and restart the sequence counter
    ///
    /// Only the write cursor moves; the storage keeps its old bytes.
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.counter = 0;
        self.indicator.set_low();
    }

    /// Activity counters
    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    /// Overflow indicator
    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    /// Transport sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Transport sink, mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
