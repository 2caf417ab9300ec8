//! Flow-controlled transport abstractions
//!
//! The device never pushes bytes at the host blindly. It waits for a
//! discrete "host ready" signal, then hands over a whole buffer at once.

use crate::gpio::InputPin;

/// Byte channel to the host with a pollable readiness signal
pub trait TransportSink {
    /// Error type for transmit operations
    type Error;

    /// Check whether the host is ready to receive
    fn is_ready(&mut self) -> bool;

    /// Write all bytes to the transport
    ///
    /// Blocks until every byte has been handed to the transport or an
    /// error occurs.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: TransportSink + ?Sized> TransportSink for &mut T {
    type Error = T::Error;

    fn is_ready(&mut self) -> bool {
        (**self).is_ready()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(data)
    }
}

/// A blocking writer gated by a hardware flow-control input
///
/// Typically a UART TX paired with a CTS/DTR style line driven by the host.
pub struct FlowControlled<W, P> {
    writer: W,
    ready_pin: P,
    /// Ready is signalled by a low level when set
    inverted: bool,
}

impl<W, P> FlowControlled<W, P>
where
    W: embedded_io::Write,
    P: InputPin,
{
    /// Create a sink that is ready while `ready_pin` is high
    pub fn new(writer: W, ready_pin: P) -> Self {
        Self {
            writer,
            ready_pin,
            inverted: false,
        }
    }

    /// Create a sink that is ready while `ready_pin` is low
    pub fn new_active_low(writer: W, ready_pin: P) -> Self {
        Self {
            writer,
            ready_pin,
            inverted: true,
        }
    }

    /// Release the writer and the ready pin
    pub fn into_inner(self) -> (W, P) {
        (self.writer, self.ready_pin)
    }
}

impl<W, P> TransportSink for FlowControlled<W, P>
where
    W: embedded_io::Write,
    P: InputPin,
{
    type Error = W::Error;

    fn is_ready(&mut self) -> bool {
        self.ready_pin.is_high() != self.inverted
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.writer.write_all(data)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct Capture {
        data: [u8; 16],
        len: usize,
        flushes: usize,
    }

    impl embedded_io::ErrorType for Capture {
        type Error = Infallible;
    }

    impl embedded_io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.data.len() - self.len);
            self.data[self.len..self.len + n].copy_from_slice(&buf[..n]);
            self.len += n;
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_ready_follows_pin() {
        let mut sink = FlowControlled::new(Capture::default(), Level(true));
        assert!(sink.is_ready());

        let mut sink = FlowControlled::new(Capture::default(), Level(false));
        assert!(!sink.is_ready());
    }

    #[test]
    fn test_active_low_ready() {
        let mut sink = FlowControlled::new_active_low(Capture::default(), Level(false));
        assert!(sink.is_ready());
    }

    #[test]
    fn test_write_all_flushes_writer() {
        let mut sink = FlowControlled::new(Capture::default(), Level(true));
        sink.write_all(&[0xAA, 1, 2, 0xBB]).unwrap();

        let (capture, _) = sink.into_inner();
        assert_eq!(&capture.data[..capture.len], &[0xAA, 1, 2, 0xBB]);
        assert_eq!(capture.flushes, 1);
    }
}
