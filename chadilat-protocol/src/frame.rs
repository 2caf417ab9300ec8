//! Frame encoding and decoding
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - SEQ (1 byte): sequence counter, wraps modulo 256
//! - TIMESTAMP (2 or 4 bytes): big-endian tick count, see [`Width`]
//! - PINS (1 byte): sampled input vector, low 4 bits significant
//! - END (1 byte): 0xBB trailer

use core::fmt;
use core::ops::Deref;

use crate::tick::{Tick, Width};

/// Frame synchronization byte
pub const START_MARKER: u8 = 0xAA;

/// Frame trailer byte
pub const END_MARKER: u8 = 0xBB;

/// Largest frame size across both widths
pub const MAX_RECORD_SIZE: usize = Width::Wide.record_size();

/// Mask for the significant bits of a pin vector
const PIN_MASK: u8 = 0x0F;

/// Errors that can occur during frame decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// First byte is not START or last byte is not END
    Malformed,
    /// Slice length does not match the frame size for this width
    WrongLength,
}

/// Sampled state of the 4 input lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinState(u8);

impl PinState {
    /// Create a pin state, discarding everything above the low nibble
    pub const fn new(bits: u8) -> Self {
        Self(bits & PIN_MASK)
    }

    /// Raw bit vector
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<u8> for PinState {
    fn from(bits: u8) -> Self {
        Self::new(bits)
    }
}

/// One decoded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record {
    /// Sequence counter
    pub counter: u8,
    /// Tick at which the pin state was observed
    pub timestamp: Tick,
    /// Pin state
    pub pins: PinState,
}

impl Record {
    /// Create a record
    pub const fn new(counter: u8, timestamp: Tick, pins: PinState) -> Self {
        Self {
            counter,
            timestamp,
            pins,
        }
    }

    /// Encode this record
    ///
    /// Never fails. A timestamp wider than `width` keeps only its low bits,
    /// which is what a narrow clock would have produced anyway.
    pub fn encode(&self, width: Width) -> EncodedRecord {
        let mut bytes = [0u8; MAX_RECORD_SIZE];
        let ts = self.timestamp.to_be_bytes();
        let ts_len = width.timestamp_len();

        bytes[0] = START_MARKER;
        bytes[1] = self.counter;
        bytes[2..2 + ts_len].copy_from_slice(&ts[4 - ts_len..]);
        bytes[2 + ts_len] = self.pins.bits();
        bytes[3 + ts_len] = END_MARKER;

        EncodedRecord {
            bytes,
            len: width.record_size() as u8,
        }
    }

    /// Decode a record from exactly one frame's worth of bytes
    ///
    /// Only the markers are validated; the fields in between are taken
    /// positionally.
    pub fn decode(bytes: &[u8], width: Width) -> Result<Self, FrameError> {
        let size = width.record_size();
        if bytes.len() != size {
            return Err(FrameError::WrongLength);
        }
        if bytes[0] != START_MARKER || bytes[size - 1] != END_MARKER {
            return Err(FrameError::Malformed);
        }

        let ts_len = width.timestamp_len();
        let timestamp = bytes[2..2 + ts_len]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);

        Ok(Self {
            counter: bytes[1],
            timestamp,
            pins: PinState::new(bytes[2 + ts_len]),
        })
    }
}

/// Text form consumed by the viewer: `<counter> <timestamp> <pins>`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.counter, self.timestamp, self.pins.bits())
    }
}

/// An encoded frame, sized for the width it was encoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedRecord {
    bytes: [u8; MAX_RECORD_SIZE],
    len: u8,
}

impl EncodedRecord {
    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl Deref for EncodedRecord {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for EncodedRecord {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_encode_narrow_layout() {
        let record = Record::new(7, 0x1234, PinState::new(0b0101));
        let encoded = record.encode(Width::Narrow);

        assert_eq!(encoded.as_bytes(), &[0xAA, 7, 0x12, 0x34, 0b0101, 0xBB]);
    }

    #[test]
    fn test_encode_wide_layout() {
        let record = Record::new(0xFF, 0xDEAD_BEEF, PinState::new(0b1000));
        let encoded = record.encode(Width::Wide);

        assert_eq!(
            encoded.as_bytes(),
            &[0xAA, 0xFF, 0xDE, 0xAD, 0xBE, 0xEF, 0b1000, 0xBB]
        );
    }

    #[test]
    fn test_encode_narrow_truncates_timestamp() {
        let record = Record::new(0, 0x0003_0010, PinState::new(1));
        let decoded = Record::decode(&record.encode(Width::Narrow), Width::Narrow).unwrap();

        assert_eq!(decoded.timestamp, 0x0010);
    }

    #[test]
    fn test_pin_state_masks_high_bits() {
        assert_eq!(PinState::new(0xF3).bits(), 0x03);
        assert_eq!(PinState::from(0xFF).bits(), 0x0F);
    }

    #[test]
    fn test_decode_rejects_missing_start() {
        let bytes = [0x00, 1, 0, 100, 1, 0xBB];
        assert_eq!(Record::decode(&bytes, Width::Narrow), Err(FrameError::Malformed));
    }

    #[test]
    fn test_decode_rejects_missing_end() {
        let bytes = [0xAA, 1, 0, 100, 1, 0xBC];
        assert_eq!(Record::decode(&bytes, Width::Narrow), Err(FrameError::Malformed));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let bytes = [0xAA, 1, 0, 100, 1, 0xBB];
        assert_eq!(Record::decode(&bytes, Width::Wide), Err(FrameError::WrongLength));
        assert_eq!(Record::decode(&bytes[..5], Width::Narrow), Err(FrameError::WrongLength));
    }

    #[test]
    fn test_decode_ignores_interior_markers() {
        // Marker values inside the frame are plain data
        let bytes = [0xAA, 0xBB, 0xAA, 0xBB, 0x0A, 0xBB];
        let record = Record::decode(&bytes, Width::Narrow).unwrap();

        assert_eq!(record.counter, 0xBB);
        assert_eq!(record.timestamp, 0xAABB);
        assert_eq!(record.pins.bits(), 0x0A);
    }

    #[test]
    fn test_display_line_format() {
        let record = Record::new(3, 65535, PinState::new(9));
        assert_eq!(record.to_string(), "3 65535 9");
    }
}
