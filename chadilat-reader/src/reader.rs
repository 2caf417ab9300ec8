//! Polling loop from byte source to text lines

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chadilat_protocol::{DecoderStats, GapCounter, SequenceObserver, StreamDecoder};
use log::{debug, info, warn};

use crate::config::ReaderConfig;
use crate::error::{ReadError, ReaderError};
use crate::source::ByteSource;

/// Sequence observer that logs every gap and keeps a tally
#[derive(Debug, Default)]
pub struct LoggingObserver {
    counter: GapCounter,
}

impl LoggingObserver {
    /// Gaps seen so far
    pub fn gaps(&self) -> GapCounter {
        self.counter
    }
}

impl SequenceObserver for LoggingObserver {
    fn on_gap(&mut self, expected: u8, observed: u8) {
        warn!(
            "Sequence gap: expected {}, got {} ({} frames missing)",
            expected,
            observed,
            observed.wrapping_sub(expected)
        );
        self.counter.on_gap(expected, observed);
    }
}

/// What one [`Reader::poll`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Bytes arrived; this many lines were written
    Decoded(usize),
    /// Nothing arrived
    Idle,
    /// The source ended
    Closed,
}

/// Session totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Bytes taken from the source
    pub bytes_read: u64,
    /// Frame and resync counts
    pub decoder: DecoderStats,
    /// Sequence discontinuities
    pub gaps: GapCounter,
}

/// Reads the device stream, decodes it and prints one line per frame
pub struct Reader<S, W> {
    source: S,
    output: W,
    decoder: StreamDecoder<LoggingObserver>,
    config: ReaderConfig,
    scratch: Vec<u8>,
    bytes_read: u64,
}

impl<S: ByteSource, W: Write> Reader<S, W> {
    /// Create a reader with a window sized for one device buffer
    pub fn new(source: S, output: W, config: ReaderConfig) -> Self {
        let decoder = StreamDecoder::with_observer(config.width, LoggingObserver::default());
        let scratch = vec![0; decoder.spare_capacity()];
        Self {
            source,
            output,
            decoder,
            config,
            scratch,
            bytes_read: 0,
        }
    }

    /// Read once and write out every frame that became complete
    ///
    /// A fatal read error drops the undecoded window before it is
    /// returned, so a caller that keeps polling resumes decoding from the
    /// next byte that arrives.
    pub fn poll(&mut self) -> Result<Step, ReaderError> {
        // Never read more than the window can take
        let want = self.decoder.spare_capacity().min(self.scratch.len());
        let n = match self.source.read_bytes(&mut self.scratch[..want]) {
            Ok(n) => n,
            Err(ReadError::NoData) => return Ok(Step::Idle),
            Err(ReadError::Closed) => return Ok(Step::Closed),
            Err(ReadError::Io(e)) => {
                debug!("Dropping {} undecoded bytes after read error", self.decoder.len());
                self.decoder.reset();
                return Err(ReaderError::Read(e));
            }
        };

        self.bytes_read += n as u64;
        self.decoder.extend(&self.scratch[..n]);

        let discarded_before = self.decoder.stats().discarded_bytes;
        let mut lines = 0;
        while let Some(record) = self.decoder.next_record() {
            writeln!(self.output, "{record}").map_err(ReaderError::Output)?;
            self.output.flush().map_err(ReaderError::Output)?;
            lines += 1;
        }

        let discarded = self.decoder.stats().discarded_bytes - discarded_before;
        if discarded > 0 {
            debug!("Resync discarded {} bytes", discarded);
        }

        Ok(Step::Decoded(lines))
    }

    /// Poll until the source closes or a fatal error occurs
    pub fn run(&mut self) -> Result<ReaderStats, ReaderError> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Like [`run`](Self::run), but also return once `shutdown` is set
    ///
    /// The flag is checked between polls. Statistics are logged on the way
    /// out in every case.
    pub fn run_until(&mut self, shutdown: &AtomicBool) -> Result<ReaderStats, ReaderError> {
        let result = self.run_inner(shutdown);
        let stats = self.stats();
        info!(
            "Read {} bytes, decoded {} frames, discarded {} bytes ({} malformed), {} gaps ({} frames missing)",
            stats.bytes_read,
            stats.decoder.frames,
            stats.decoder.discarded_bytes,
            stats.decoder.malformed,
            stats.gaps.gaps,
            stats.gaps.missing_frames,
        );
        result.map(|()| stats)
    }

    fn run_inner(&mut self, shutdown: &AtomicBool) -> Result<(), ReaderError> {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                info!("Shutdown requested");
                break;
            }
            match self.poll()? {
                Step::Decoded(_) => {}
                Step::Idle => thread::sleep(self.config.poll_interval),
                Step::Closed => {
                    info!("Byte source closed");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Totals so far
    pub fn stats(&self) -> ReaderStats {
        ReaderStats {
            bytes_read: self.bytes_read,
            decoder: self.decoder.stats(),
            gaps: self.decoder.observer().gaps(),
        }
    }

    /// Line sink
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Consume the reader, returning the line sink
    pub fn into_output(self) -> W {
        self.output
    }
}
