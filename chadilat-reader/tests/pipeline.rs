//! Device pipeline into the host reader, end to end

use std::cell::Cell;
use std::convert::Infallible;
use std::io::Write;
use std::time::Duration;

use chadilat_core::{Clock, Sampler, SamplerConfig};
use chadilat_hal::{InputPort, NoIndicator, TransportSink};
use chadilat_protocol::{Tick, Width, BUFFER_RECORDS};
use chadilat_reader::{open_replay, IoSource, Reader, ReaderConfig};

struct Bench {
    now: Cell<Tick>,
    pins: Cell<u8>,
}

impl Clock for Bench {
    fn width(&self) -> Width {
        Width::Narrow
    }

    fn now(&self) -> Tick {
        self.now.get()
    }
}

impl InputPort for &Bench {
    fn read(&mut self) -> u8 {
        self.pins.get()
    }
}

/// Host end of the link; always ready
#[derive(Default, Clone)]
struct Link {
    bytes: Vec<u8>,
    transfers: usize,
}

impl TransportSink for Link {
    type Error = Infallible;

    fn is_ready(&mut self) -> bool {
        true
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.bytes.extend_from_slice(data);
        self.transfers += 1;
        Ok(())
    }
}

/// Toggle input 0 `edges` times, 7 ticks apart, then let the line go idle
fn capture(edges: usize) -> Link {
    let bench = Bench {
        now: Cell::new(0),
        pins: Cell::new(0),
    };
    let mut sampler = Sampler::new(
        &bench,
        &bench,
        Link::default(),
        NoIndicator::default(),
        SamplerConfig::default(),
    );

    for _ in 0..edges {
        for _ in 0..7 {
            bench.now.set(bench.now.get() + 1);
            sampler.poll().unwrap();
        }
        bench.pins.set(bench.pins.get() ^ 1);
    }
    for _ in 0..100 {
        bench.now.set(bench.now.get() + 1);
        sampler.poll().unwrap();
    }
    assert!(sampler.buffer().is_empty(), "idle flush should have drained the buffer");

    sampler.buffer().sink().clone()
}

fn config() -> ReaderConfig {
    ReaderConfig {
        width: Width::Narrow,
        poll_interval: Duration::ZERO,
    }
}

fn decode_lines(bytes: Vec<u8>) -> Vec<(u8, u32, u8)> {
    let mut reader = Reader::new(IoSource::new(&bytes[..]), Vec::new(), config());
    reader.run().unwrap();
    String::from_utf8(reader.into_output())
        .unwrap()
        .lines()
        .map(|line| {
            let mut fields = line.split(' ').map(|f| f.parse::<u32>().unwrap());
            let counter = fields.next().unwrap() as u8;
            let timestamp = fields.next().unwrap();
            let pins = fields.next().unwrap() as u8;
            assert!(fields.next().is_none());
            (counter, timestamp, pins)
        })
        .collect()
}

#[test]
fn every_edge_reaches_the_host_in_order() {
    let link = capture(10);
    let lines = decode_lines(link.bytes);

    assert_eq!(lines.len(), 20);
    for (i, pair) in lines.chunks(2).enumerate() {
        // The input flips after tick 7(i+1) and is seen on the next poll
        let last_seen = 7 * (i as u32 + 1);
        assert_eq!(pair[0], (2 * i as u8, last_seen, (i % 2) as u8));
        assert_eq!(pair[1], (2 * i as u8 + 1, last_seen + 1, ((i + 1) % 2) as u8));
    }
}

#[test]
fn backpressure_splits_batches_without_losing_frames() {
    // Enough edges to overflow the device buffer more than once
    let edges = BUFFER_RECORDS + 10;
    let link = capture(edges);
    assert!(link.transfers >= 3);

    let lines = decode_lines(link.bytes);
    assert_eq!(lines.len(), 2 * edges);

    // Counters restart at zero with every batch, not only on u8 wrap
    let restarts = lines
        .windows(2)
        .filter(|w| w[1].0 == 0 && w[0].0 != 255)
        .count();
    assert_eq!(restarts + 1, link.transfers);

    let timestamps: Vec<u32> = lines.iter().map(|&(_, ts, _)| ts).collect();
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn noise_on_the_line_costs_only_the_noise() {
    let link = capture(4);
    let clean = decode_lines(link.bytes.clone());

    let mut noisy = vec![0x13, 0xAA, 0x00, 0x37];
    noisy.extend_from_slice(&link.bytes);

    let mut reader = Reader::new(IoSource::new(&noisy[..]), Vec::new(), config());
    let stats = reader.run().unwrap();
    assert_eq!(stats.decoder.frames, clean.len() as u64);
    assert_eq!(stats.decoder.discarded_bytes, 4);
    assert_eq!(stats.gaps.gaps, 0);
}

#[test]
fn replay_from_capture_file() {
    let link = capture(3);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&link.bytes).unwrap();
    file.flush().unwrap();

    let source = open_replay(file.path()).unwrap();
    let mut reader = Reader::new(source, Vec::new(), config());
    let stats = reader.run().unwrap();

    assert_eq!(stats.decoder.frames, 6);
    assert_eq!(stats.bytes_read, link.bytes.len() as u64);
    let text = String::from_utf8(reader.into_output()).unwrap();
    assert_eq!(text.lines().next(), Some("0 7 0"));
}
