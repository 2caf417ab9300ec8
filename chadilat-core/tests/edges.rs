//! Property tests for the sampler as seen from the wire

use std::cell::Cell;
use std::convert::Infallible;

use chadilat_core::{Clock, Sampler, SamplerConfig};
use chadilat_hal::{InputPort, NoIndicator, TransportSink};
use chadilat_protocol::{PinState, Record, StreamDecoder, Tick, Width};
use proptest::prelude::*;

struct Stepper {
    now: Cell<Tick>,
    pins: Cell<u8>,
}

impl Clock for Stepper {
    fn width(&self) -> Width {
        Width::Narrow
    }

    fn now(&self) -> Tick {
        self.now.get()
    }
}

impl InputPort for &Stepper {
    fn read(&mut self) -> u8 {
        self.pins.get()
    }
}

#[derive(Default)]
struct Wire(Vec<u8>);

impl TransportSink for Wire {
    type Error = Infallible;

    fn is_ready(&mut self) -> bool {
        true
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.extend_from_slice(data);
        Ok(())
    }
}

/// Run the sampler over `(delta, pins)` steps and return every frame it
/// produced, sent or still buffered, plus the levels seen at each poll
fn run(steps: &[(u8, u8)]) -> (Vec<Record>, Vec<(Tick, u8)>) {
    let stepper = Stepper {
        now: Cell::new(0),
        pins: Cell::new(0),
    };
    let mut sampler = Sampler::new(
        &stepper,
        &stepper,
        Wire::default(),
        NoIndicator::default(),
        SamplerConfig::default(),
    );

    let mut polled = Vec::new();
    for &(delta, pins) in steps {
        stepper.now.set(stepper.now.get() + delta as Tick);
        stepper.pins.set(pins);
        sampler.poll().unwrap();
        polled.push((stepper.now.get(), pins & 0x0F));
    }
    sampler.flush().unwrap();

    let mut decoder = StreamDecoder::new(Width::Narrow);
    let mut records = Vec::new();
    for chunk in sampler.buffer().sink().0.chunks(64) {
        decoder.extend(chunk);
        records.extend(decoder.records());
    }
    (records, polled)
}

proptest! {
    #[test]
    fn frames_come_in_closing_opening_pairs(
        steps in prop::collection::vec((1u8..40, any::<u8>()), 0..400),
    ) {
        let (records, polled) = run(&steps);

        let transitions = polled
            .iter()
            .scan(0u8, |level, &(_, pins)| {
                let changed = pins != *level;
                *level = pins;
                Some(changed)
            })
            .filter(|&changed| changed)
            .count();
        prop_assert_eq!(records.len(), transitions * 2);

        let mut level = PinState::default();
        for pair in records.chunks(2) {
            prop_assert_eq!(pair[0].pins, level);
            prop_assert_ne!(pair[1].pins, level);
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
            level = pair[1].pins;
        }
    }

    #[test]
    fn every_poll_level_is_recoverable(
        steps in prop::collection::vec((1u8..40, 0u8..16), 1..400),
    ) {
        let (records, polled) = run(&steps);

        // Level at tick t is the pins of the last opening frame at or before t
        for &(tick, pins) in &polled {
            let level = records
                .chunks(2)
                .filter(|pair| pair[1].timestamp <= tick)
                .last()
                .map_or(0, |pair| pair[1].pins.bits());
            prop_assert_eq!(level, pins);
        }
    }
}
