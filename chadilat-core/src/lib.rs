//! Board-agnostic sampling logic for the Chadilat device
//!
//! This crate contains everything the firmware does that does not depend
//! on a particular chip:
//!
//! - Monotonic tick clocks, narrow and overflow-extended
//! - The bounded frame buffer with its flush/backpressure policy
//! - The edge-triggered sampler that decides when frames are emitted
//!
//! Hardware is reached only through `chadilat-hal` traits, so the whole
//! pipeline runs under `cargo test` on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod clock;
pub mod sampler;

pub use buffer::{BufferFull, BufferStats, FrameBuffer};
pub use clock::{Clock, NarrowClock, WideClock};
pub use sampler::{PollOutcome, Sampler, SamplerConfig};
