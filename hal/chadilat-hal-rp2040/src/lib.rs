//! RP2040 implementations of the `chadilat-hal` traits
//!
//! - [`PwmCounter`]: a PWM slice running free as the 16-bit sample clock,
//!   with its wrap flag exposed for the overflow interrupt
//! - [`SampleInput`], [`IndicatorLed`], [`ReadyLine`]: GPIO newtypes
//!
//! Nothing here knows about frames or buffers; that lives in
//! `chadilat-core`.

#![no_std]

pub mod counter;
pub mod gpio;

pub use counter::{PwmCounter, TICK_DIVIDER, TICK_HZ};
pub use gpio::{IndicatorLed, ReadyLine, SampleInput};
