//! Free-running PWM slice as the sample clock
//!
//! The slice counts `0..=0xFFFF` at `sys_clk / TICK_DIVIDER` and wraps. Its
//! raw wrap flag in `PWM.INTR` is the pending-overflow signal the wide clock
//! uses to repair reads taken just after a wrap.

use chadilat_hal::HardwareCounter;
use embassy_rp::interrupt::{self, InterruptExt};
use embassy_rp::pac;
use embassy_rp::pac::pwm::regs::Intr;
use embassy_rp::pwm::{Config, Pwm, Slice};
use embassy_rp::Peri;
use fixed::types::extra::U4;
use fixed::FixedU16;

/// Integer system clock divider (the PWM divider allows up to 255 15/16)
pub const TICK_DIVIDER: u8 = 250;

/// Tick rate at the default 125 MHz system clock, one tick every 2 µs
pub const TICK_HZ: u32 = 125_000_000 / TICK_DIVIDER as u32;

/// Counter register of one PWM slice
///
/// A plain handle with no ownership of the slice, so it can sit in a
/// `static` shared with the wrap interrupt. The slice itself is configured
/// once through [`start`](Self::start).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmCounter {
    slice: usize,
}

impl PwmCounter {
    /// Handle for PWM slice number `slice`
    pub const fn new(slice: usize) -> Self {
        Self { slice }
    }

    /// Configure the slice as a free-running 16-bit counter and start it
    ///
    /// `slice` must be the peripheral this handle was created for. The
    /// returned driver stops the slice when dropped, so keep it alive.
    pub fn start<'d, T: Slice>(&self, slice: Peri<'d, T>) -> Pwm<'d> {
        let mut config = Config::default();
        config.top = u16::MAX;
        config.divider = FixedU16::<U4>::from_num(TICK_DIVIDER);
        config.enable = true;
        Pwm::new_free(slice, config)
    }

    /// Unmask the wrap interrupt for this slice
    ///
    /// The firmware must provide a `PWM_IRQ_WRAP` handler that calls
    /// [`clear_wrap`](Self::clear_wrap) before counting the overflow.
    pub fn enable_wrap_interrupt(&self) {
        self.clear_wrap();
        pac::PWM.inte().modify(|w| w.0 |= self.mask());
        interrupt::PWM_IRQ_WRAP.unpend();
        // SAFETY: the handler only touches the overflow count, which is
        // guarded by a critical section everywhere else.
        unsafe { interrupt::PWM_IRQ_WRAP.enable() };
    }

    /// Acknowledge a wrap
    pub fn clear_wrap(&self) {
        pac::PWM.intr().write_value(Intr(self.mask()));
    }

    fn mask(&self) -> u32 {
        1 << self.slice
    }
}

impl HardwareCounter for PwmCounter {
    fn count(&self) -> u16 {
        pac::PWM.ch(self.slice).ctr().read().ctr()
    }

    fn overflow_pending(&self) -> bool {
        pac::PWM.intr().read().0 & self.mask() != 0
    }
}
