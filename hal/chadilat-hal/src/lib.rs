//! Chadilat Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the sampler depends on. Chip
//! specific crates implement them, and host tests implement them with
//! plain structs, so the sampling logic never touches a register directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  chadilat-core (sampler, frame buffer)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chadilat-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chadilat-hal- │       │  test fakes   │
//! │    rp2040     │       │  (host only)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::InputPort`] - The sampled 4-bit input vector
//! - [`counter::HardwareCounter`] - Free-running 16-bit timer
//! - [`transport::TransportSink`] - Flow-controlled byte channel to the host

#![no_std]
#![deny(unsafe_code)]

pub mod counter;
pub mod gpio;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use counter::HardwareCounter;
pub use gpio::{InputPin, InputPort, NoIndicator, OutputPin, PinGroup};
pub use transport::{FlowControlled, TransportSink};
