use std::time::Duration;

use chadilat_protocol::{Width, WIDTH};

/// Sleep between polls that produced nothing
pub const HOST_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Reader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Frame width the device was built with
    pub width: Width,
    /// Idle wait after a poll that yielded no data
    pub poll_interval: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            poll_interval: HOST_POLL_INTERVAL,
        }
    }
}
