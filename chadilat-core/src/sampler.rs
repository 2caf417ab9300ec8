//! Edge-triggered sampler
//!
//! The sampler does not record at a fixed rate. It polls the input vector
//! as fast as the loop runs and emits frames only when the vector changes.
//! Each change produces two frames:
//!
//! 1. the *old* level stamped with the last tick it was still observed,
//! 2. the *new* level stamped with the current tick.
//!
//! The first frame pins down the end of the previous interval to within one
//! poll, so a viewer can draw exact edges while bandwidth stays
//! proportional to the number of transitions.
//!
//! A quiet input would leave frames sitting in the buffer indefinitely, so
//! the buffer is also flushed once [`SamplerConfig::flush_idle_ticks`] pass
//! without a new frame.

use chadilat_hal::{InputPort, OutputPin, TransportSink};
use chadilat_protocol::{PinState, Tick, FLUSH_IDLE_TICKS};

use crate::buffer::FrameBuffer;
use crate::clock::Clock;

/// Sampler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Ticks without a new frame before a non-empty buffer is flushed
    pub flush_idle_ticks: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            flush_idle_ticks: FLUSH_IDLE_TICKS,
        }
    }
}

/// What a single poll did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollOutcome {
    /// Frames committed to the buffer (0 or 2)
    pub frames: u8,
    /// Flushes performed, for backpressure or idleness
    pub flushes: u8,
}

impl PollOutcome {
    /// Check if the poll transferred anything to the host
    pub fn flushed(&self) -> bool {
        self.flushes > 0
    }
}

/// Device state: inputs, clock, frame buffer and the edge detector
pub struct Sampler<P, C, S, L> {
    port: P,
    clock: C,
    buffer: FrameBuffer<S, L>,
    config: SamplerConfig,
    last_pins: PinState,
    last_timestamp: Tick,
    last_activity: Tick,
}

impl<P, C, S, L> Sampler<P, C, S, L>
where
    P: InputPort,
    C: Clock,
    S: TransportSink,
    L: OutputPin,
{
    /// Create a sampler; frame width follows the clock width
    ///
    /// The initial level is all-low at tick 0, so inputs that are already
    /// high at start-up produce a transition on the first poll.
    pub fn new(port: P, clock: C, sink: S, indicator: L, config: SamplerConfig) -> Self {
        let buffer = FrameBuffer::new(clock.width(), sink, indicator);
        Self {
            port,
            clock,
            buffer,
            config,
            last_pins: PinState::default(),
            last_timestamp: 0,
            last_activity: 0,
        }
    }

    /// Run one iteration of the sampling loop
    ///
    /// May block inside a flush until the host is ready. A transport error
    /// is returned after the poll has finished its work, so no frame of a
    /// transition pair is skipped because of it.
    pub fn poll(&mut self) -> Result<PollOutcome, S::Error> {
        let ts = self.clock.now();
        let pins = PinState::new(self.port.read());
        let width = self.buffer.width();
        let mut outcome = PollOutcome::default();
        let mut result = Ok(());

        if pins != self.last_pins {
            let closing = self.commit(self.last_timestamp, self.last_pins, &mut outcome);
            let opening = self.commit(ts, pins, &mut outcome);
            result = closing.and(opening);
            self.last_pins = pins;
            self.last_activity = ts;
        }

        if !self.buffer.is_empty()
            && width.elapsed(ts, self.last_activity) > self.config.flush_idle_ticks
        {
            let flushed = self.buffer.flush();
            outcome.flushes = outcome.flushes.saturating_add(1);
            self.last_activity = ts;
            result = result.and(flushed);
        }

        self.last_timestamp = ts;
        result.map(|()| outcome)
    }

    /// Flush whatever is buffered right now
    pub fn flush(&mut self) -> Result<(), S::Error> {
        self.buffer.flush()
    }

    /// Pin state as of the last poll
    pub fn last_pins(&self) -> PinState {
        self.last_pins
    }

    /// Tick of the last poll
    pub fn last_timestamp(&self) -> Tick {
        self.last_timestamp
    }

    /// Frame buffer
    pub fn buffer(&self) -> &FrameBuffer<S, L> {
        &self.buffer
    }

    /// Clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Write one frame, flushing as often as needed to make room
    fn commit(&mut self, ts: Tick, pins: PinState, outcome: &mut PollOutcome) -> Result<(), S::Error> {
        let mut result = Ok(());
        while self.buffer.write(ts, pins).is_err() {
            if let Err(e) = self.buffer.flush() {
                result = Err(e);
            }
            outcome.flushes = outcome.flushes.saturating_add(1);
        }
        outcome.frames = outcome.frames.saturating_add(1);
        result
    }
}
