//! Sample clock wiring
//!
//! PWM slice 0 runs free as the 16-bit tick source. With
//! `wide-timestamps` its wrap interrupt extends it to 32 bits.

use chadilat_hal_rp2040::PwmCounter;
use embassy_rp::peripherals::PWM_SLICE0;
use embassy_rp::pwm::Pwm;
use embassy_rp::Peri;

#[cfg(feature = "wide-timestamps")]
use embassy_rp::interrupt;

#[cfg(not(feature = "wide-timestamps"))]
pub type SampleClock = chadilat_core::NarrowClock<PwmCounter>;
#[cfg(feature = "wide-timestamps")]
pub type SampleClock = chadilat_core::WideClock<PwmCounter>;

/// Shared with the wrap interrupt
pub static CLOCK: SampleClock = SampleClock::new(PwmCounter::new(0));

/// Start the tick counter
///
/// The returned driver owns the slice; dropping it stops the clock.
pub fn start(slice: Peri<'static, PWM_SLICE0>) -> Pwm<'static> {
    let pwm = CLOCK.counter().start(slice);
    #[cfg(feature = "wide-timestamps")]
    CLOCK.counter().enable_wrap_interrupt();
    pwm
}

#[cfg(feature = "wide-timestamps")]
#[interrupt]
unsafe fn PWM_IRQ_WRAP() {
    CLOCK.counter().clear_wrap();
    CLOCK.on_overflow();
}
