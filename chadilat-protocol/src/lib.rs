//! Chadilat telemetry protocol
//!
//! This crate defines the wire format between the sampling device and the
//! host reader, plus the host-side stream synchronizer. Every sample is one
//! fixed-width frame:
//!
//! ```text
//! ┌───────┬─────┬──────────────┬──────┬─────┐
//! │ START │ SEQ │ TIMESTAMP    │ PINS │ END │
//! │ 1B    │ 1B  │ 2B / 4B (BE) │ 1B   │ 1B  │
//! └───────┴─────┴──────────────┴──────┴─────┘
//! ```
//!
//! There is no length prefix and no checksum. The START/END marker pair and
//! the fixed frame length are the only integrity signal, which keeps the
//! device side trivial and lets the host recover from garbage by sliding
//! forward one byte at a time.
//!
//! The timestamp width is a build-time choice, see [`config::WIDTH`].

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod sequence;
pub mod stream;
pub mod tick;

pub use config::{BUFFER_RECORDS, FLUSH_IDLE_TICKS, WIDTH, WINDOW_CAPACITY};
pub use frame::{EncodedRecord, FrameError, PinState, Record, END_MARKER, MAX_RECORD_SIZE, START_MARKER};
pub use sequence::{Continuity, GapCounter, SequenceObserver, SequenceTracker};
pub use stream::{DecoderStats, Records, StreamDecoder};
pub use tick::{Tick, Width};
