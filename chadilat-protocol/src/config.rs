//! Build-time protocol configuration
//!
//! None of these are runtime options. Device and host must be built with
//! the same `wide-timestamps` setting or the host will never find a frame.

use crate::tick::Width;

/// Timestamp width selected for this build
#[cfg(feature = "wide-timestamps")]
pub const WIDTH: Width = Width::Wide;

/// Timestamp width selected for this build
#[cfg(not(feature = "wide-timestamps"))]
pub const WIDTH: Width = Width::Narrow;

/// Device buffer capacity in frames
pub const BUFFER_RECORDS: usize = 300;

/// Ticks without activity before a non-empty device buffer is flushed
pub const FLUSH_IDLE_TICKS: u32 = 50;

/// Host window size in bytes: one full device buffer at the build width
pub const WINDOW_CAPACITY: usize = BUFFER_RECORDS * WIDTH.record_size();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamDecoder;

    #[test]
    fn test_window_holds_one_device_buffer() {
        assert_eq!(WINDOW_CAPACITY, 300 * WIDTH.record_size());
        #[cfg(not(feature = "wide-timestamps"))]
        assert_eq!(WINDOW_CAPACITY, 1800);
        #[cfg(feature = "wide-timestamps")]
        assert_eq!(WINDOW_CAPACITY, 2400);

        let decoder = StreamDecoder::new(WIDTH);
        assert_eq!(decoder.spare_capacity(), WINDOW_CAPACITY);
    }
}

