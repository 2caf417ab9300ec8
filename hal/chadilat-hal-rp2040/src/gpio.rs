//! GPIO newtypes implementing the HAL pin traits

use chadilat_hal::{InputPin, OutputPin};
use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;

/// One of the sampled inputs, pulled up so a floating probe reads high
pub struct SampleInput<'d> {
    pin: Input<'d>,
}

impl<'d> SampleInput<'d> {
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::Up),
        }
    }
}

impl InputPin for SampleInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Host-ready handshake input (DTR from the USB-serial bridge)
///
/// Pulled up, so with an active-low bridge an unplugged host reads as not
/// ready.
pub struct ReadyLine<'d> {
    pin: Input<'d>,
}

impl<'d> ReadyLine<'d> {
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::Up),
        }
    }
}

impl InputPin for ReadyLine<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// LED driven high while the frame buffer is full
pub struct IndicatorLed<'d> {
    pin: Output<'d>,
}

impl<'d> IndicatorLed<'d> {
    /// Create the LED, initially off
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for IndicatorLed<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
