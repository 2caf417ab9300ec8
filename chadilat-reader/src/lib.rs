//! Host side of the Chadilat logic analyzer
//!
//! Reads the device's frame stream from a serial port (or a capture file),
//! resynchronizes it and prints one `<counter> <timestamp> <pins>` line per
//! frame for the viewer.
//!
//! ```text
//! ByteSource ──► StreamDecoder ──► "<counter> <timestamp> <pins>\n"
//! (serial/file)   (resync, gaps)    (stdout, flushed per line)
//! ```

pub mod config;
pub mod error;
pub mod reader;
pub mod source;

pub use config::{ReaderConfig, HOST_POLL_INTERVAL};
pub use error::{ReadError, ReaderError};
pub use reader::{LoggingObserver, Reader, ReaderStats, Step};
pub use source::{open_replay, ByteSource, IoSource, ReplaySource, SerialSource};
