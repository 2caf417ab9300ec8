use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Outcome of a failed read from a [`ByteSource`](crate::ByteSource)
#[derive(Debug, Error)]
pub enum ReadError {
    /// Nothing has arrived yet; try again after the idle interval
    #[error("no data available")]
    NoData,

    /// The source reached its end and will never yield more bytes
    #[error("byte source closed")]
    Closed,

    /// The source failed and cannot be read further
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

impl ReadError {
    /// Check whether the read may succeed if retried later
    pub fn is_transient(&self) -> bool {
        matches!(self, ReadError::NoData)
    }
}

/// Errors that end a reader session
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to open serial device {path}: {source}")]
    OpenSerial {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to configure serial device {path}: {source}")]
    ConfigureSerial {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to open capture file {}: {source}", path.display())]
    OpenReplay {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("transport read failed: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write decoded output: {0}")]
    Output(#[source] io::Error),
}

impl ReaderError {
    /// The consumer of the decoded lines went away
    ///
    /// A viewer closing its end of the pipe is the normal way a session
    /// ends, not a failure.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, ReaderError::Output(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_no_data_is_transient() {
        assert!(ReadError::NoData.is_transient());
        assert!(!ReadError::Closed.is_transient());
        assert!(!ReadError::Io(io::Error::other("gone")).is_transient());
    }

    #[test]
    fn test_broken_pipe_detection() {
        let pipe = ReaderError::Output(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(pipe.is_broken_pipe());

        let read = ReaderError::Read(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(!read.is_broken_pipe());
    }
}
