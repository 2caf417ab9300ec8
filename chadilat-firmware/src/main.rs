//! Chadilat - Cheap and Dirty Logic Analyzer
//!
//! Firmware for RP2040 boards. Samples four inputs as fast as the loop
//! runs, records every transition with a timestamp and ships the frames to
//! the host in batches whenever the host signals it is ready.
//!
//! Pin assignment (Raspberry Pi Pico):
//!
//! | Function          | GPIO   |
//! |-------------------|--------|
//! | UART0 TX / RX     | 0 / 1  |
//! | Inputs 0..3       | 2..5   |
//! | Host ready (DTR)  | 6      |
//! | Overflow LED      | 25     |

#![no_std]
#![no_main]

use chadilat_core::{Clock, Sampler, SamplerConfig};
use chadilat_hal::{FlowControlled, PinGroup, TransportSink};
use chadilat_hal_rp2040::{IndicatorLed, ReadyLine, SampleInput, TICK_HZ};
use chadilat_protocol::BUFFER_RECORDS;
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod clock;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Link speed; matches the reader's default
const BAUD_RATE: u32 = 9600;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Chadilat firmware starting...");

    let p = embassy_rp::init(Default::default());

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();

    let mut sink = FlowControlled::new_active_low(tx, ReadyLine::new(p.PIN_6));
    info!("UART initialized at {} baud", BAUD_RATE);

    let inputs = PinGroup::new([
        SampleInput::new(p.PIN_2),
        SampleInput::new(p.PIN_3),
        SampleInput::new(p.PIN_4),
        SampleInput::new(p.PIN_5),
    ]);
    let led = IndicatorLed::new(p.PIN_25);

    // Frames are useless until someone is listening
    info!("Waiting for host...");
    while !sink.is_ready() {
        Timer::after_millis(10).await;
    }
    info!("Host ready");

    let _pwm = clock::start(p.PWM_SLICE0);
    info!(
        "Sample clock running at {} Hz, {:?} timestamps",
        TICK_HZ,
        clock::CLOCK.width()
    );

    let mut sampler = Sampler::new(inputs, &clock::CLOCK, sink, led, SamplerConfig::default());
    info!("Sampling, {} frames per batch", BUFFER_RECORDS);

    let mut overflows = 0;
    loop {
        if let Err(e) = sampler.poll() {
            warn!("Transfer to host failed: {}", e);
        }

        let stats = sampler.buffer().stats();
        if stats.overflows != overflows {
            overflows = stats.overflows;
            debug!(
                "Buffer full: {} overflows, {} flushes, {} frames",
                stats.overflows, stats.flushes, stats.frames
            );
        }
    }
}
