//! Transfer request descriptor.
//!
//! The controlling side hands the endpoint a 16-byte record describing one
//! register transfer:
//!
//! ```text
//!  offset  size  field
//!  0       2     len        bytes to transfer
//!  2       2     register   first register address
//!  4       1     write      0 = read, nonzero = write
//!  5       3     (padding, zero)
//!  8       8     buffer     address of the caller's data buffer
//! ```
//!
//! Multi-byte fields use the host's native byte order, as the controlling
//! process lays the record out in its own memory. Encoding and decoding go
//! field by field at these offsets.

use tof_comms::Direction;

const LEN_OFFSET: usize = 0;
const REGISTER_OFFSET: usize = 2;
const FLAG_OFFSET: usize = 4;
const BUFFER_OFFSET: usize = 8;

/// One register transfer requested across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferRequest {
    /// Bytes to transfer.
    pub len: u16,
    /// First register address.
    pub register: u16,
    pub direction: Direction,
    /// Caller-side address of the data buffer.
    pub buffer: u64,
}

impl TransferRequest {
    /// Encoded size in bytes.
    pub const SIZE: usize = 16;

    pub fn read(register: u16, len: u16, buffer: u64) -> Self {
        Self {
            len,
            register,
            direction: Direction::Read,
            buffer,
        }
    }

    pub fn write(register: u16, len: u16, buffer: u64) -> Self {
        Self {
            len,
            register,
            direction: Direction::Write,
            buffer,
        }
    }

    /// Decode a descriptor. Padding bytes are ignored.
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let direction = if bytes[FLAG_OFFSET] != 0 {
            Direction::Write
        } else {
            Direction::Read
        };

        Self {
            len: u16::from_ne_bytes([bytes[LEN_OFFSET], bytes[LEN_OFFSET + 1]]),
            register: u16::from_ne_bytes([bytes[REGISTER_OFFSET], bytes[REGISTER_OFFSET + 1]]),
            direction,
            buffer: u64::from_ne_bytes([
                bytes[BUFFER_OFFSET],
                bytes[BUFFER_OFFSET + 1],
                bytes[BUFFER_OFFSET + 2],
                bytes[BUFFER_OFFSET + 3],
                bytes[BUFFER_OFFSET + 4],
                bytes[BUFFER_OFFSET + 5],
                bytes[BUFFER_OFFSET + 6],
                bytes[BUFFER_OFFSET + 7],
            ]),
        }
    }

    /// Encode with zeroed padding. A write is flagged as 1.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[LEN_OFFSET..LEN_OFFSET + 2].copy_from_slice(&self.len.to_ne_bytes());
        bytes[REGISTER_OFFSET..REGISTER_OFFSET + 2].copy_from_slice(&self.register.to_ne_bytes());
        bytes[FLAG_OFFSET] = u8::from(self.direction == Direction::Write);
        bytes[BUFFER_OFFSET..].copy_from_slice(&self.buffer.to_ne_bytes());
        bytes
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
