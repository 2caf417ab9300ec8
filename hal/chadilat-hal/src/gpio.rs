//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins, and for the group of
//! inputs that is sampled as one vector.

/// Number of significant bits in a sampled input vector
pub const PORT_WIDTH: usize = 4;

/// Digital output pin
///
/// Used for the buffer overflow indicator.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;
}

/// A group of inputs read as a single vector
///
/// Bit `n` of the returned value is input `n`. Only the low
/// [`PORT_WIDTH`] bits are significant; implementations must clear the
/// rest.
pub trait InputPort {
    /// Sample all inputs
    fn read(&mut self) -> u8;
}

/// Four discrete input pins presented as an [`InputPort`]
///
/// Pins are read one after another, so the vector is not a simultaneous
/// snapshot. That matches what a port register read gives on most parts
/// to within a few cycles.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinGroup<P> {
    pins: [P; PORT_WIDTH],
}

impl<P: InputPin> PinGroup<P> {
    /// Create a group; `pins[0]` becomes bit 0
    pub fn new(pins: [P; PORT_WIDTH]) -> Self {
        Self { pins }
    }
}

impl<P: InputPin> InputPort for PinGroup<P> {
    fn read(&mut self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, pin)| {
                if pin.is_high() {
                    acc | (1 << bit)
                } else {
                    acc
                }
            })
    }
}

/// Output pin that does nothing
///
/// For boards without an indicator LED.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoIndicator {
    state: bool,
}

impl OutputPin for NoIndicator {
    fn set_high(&mut self) {
        self.state = true;
    }

    fn set_low(&mut self) {
        self.state = false;
    }

    fn is_set_high(&self) -> bool {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPin(bool);

    impl InputPin for FixedPin {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_pin_group_bit_order() {
        let mut group = PinGroup::new([
            FixedPin(true),
            FixedPin(false),
            FixedPin(false),
            FixedPin(true),
        ]);
        assert_eq!(group.read(), 0b1001);
    }

    #[test]
    fn test_pin_group_all_low() {
        let mut group = PinGroup::new([
            FixedPin(false),
            FixedPin(false),
            FixedPin(false),
            FixedPin(false),
        ]);
        assert_eq!(group.read(), 0);
    }

    #[test]
    fn test_no_indicator_remembers_level() {
        let mut led = NoIndicator::default();
        assert!(!led.is_set_high());

        led.set_high();
        assert!(led.is_set_high());
        assert_eq!(led, NoIndicator { state: true });

        led.set_low();
        assert_eq!(led, NoIndicator::default());
    }
}
