//! Byte sources the reader can decode from
//!
//! Reads never block for long. A source with nothing to offer reports
//! [`ReadError::NoData`] and the reader sleeps before asking again.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::error::{ReadError, ReaderError};

/// Non-blocking supplier of raw bytes
pub trait ByteSource {
    /// Read up to `buf.len()` bytes
    ///
    /// Returns the number of bytes read, which is never zero on success.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ReadError>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        (**self).read_bytes(buf)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        (**self).read_bytes(buf)
    }
}

/// Translate a `std::io` read into the reader's classification
fn classify(result: io::Result<usize>) -> Result<usize, ReadError> {
    match result {
        Ok(0) => Err(ReadError::Closed),
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted => {
                Err(ReadError::NoData)
            }
            _ => Err(ReadError::Io(e)),
        },
    }
}

/// Any [`std::io::Read`] as a byte source
///
/// End of input closes the source.
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        classify(self.inner.read(buf))
    }
}

/// Live serial link to the sampler
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    /// Read timeout; short enough to behave as a non-blocking read
    pub const READ_TIMEOUT: Duration = Duration::from_millis(1);

    /// Open `path` raw 8N1 without flow control and raise DTR
    ///
    /// DTR is the host-ready line the device waits for before every flush,
    /// so it stays asserted for the lifetime of the source.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, ReaderError> {
        let mut port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Self::READ_TIMEOUT)
            .open()
            .map_err(|source| ReaderError::OpenSerial {
                path: path.to_string(),
                source,
            })?;

        port.write_data_terminal_ready(true)
            .map_err(|source| ReaderError::ConfigureSerial {
                path: path.to_string(),
                source,
            })?;

        log::info!("Opened {} at {} baud", path, baud_rate);
        Ok(Self { port })
    }
}

impl ByteSource for SerialSource {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        match classify(self.port.read(buf)) {
            // A tty that reports zero bytes has simply timed out
            Err(ReadError::Closed) => Err(ReadError::NoData),
            other => other,
        }
    }
}

/// Previously captured device output, read from a file
pub type ReplaySource = IoSource<BufReader<File>>;

/// Open a capture file for replay
pub fn open_replay(path: &Path) -> Result<ReplaySource, ReaderError> {
    let file = File::open(path).map_err(|source| ReaderError::OpenReplay {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Replaying {}", path.display());
    Ok(IoSource::new(BufReader::new(file)))
}
