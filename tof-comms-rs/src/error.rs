//! Error types for the register transport.

use core::fmt;

use crate::transport::Direction;

/// Errors that can occur while moving bytes to or from the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommsError<E> {
    /// The bus reported a failed transaction. The transfer was aborted at
    /// `offset` bytes into the logical transfer; bytes before it may or may
    /// not have moved.
    Transport {
        direction: Direction,
        offset: usize,
        source: E,
    },

    /// `address + len` runs past the end of the 16-bit register space.
    /// Nothing was sent on the bus.
    AddressOverflow { address: u16, len: usize },

    /// The identity registers did not hold the expected values.
    UnknownDevice { device_id: u8, revision_id: u8 },
}

impl<E> CommsError<E> {
    pub(crate) fn transport(direction: Direction, offset: usize, source: E) -> Self {
        CommsError::Transport {
            direction,
            offset,
            source,
        }
    }

    /// Shift the offset of a transport failure by `base` bytes.
    ///
    /// Used when a caller splits one logical transfer into several calls and
    /// wants the failure located relative to the whole transfer.
    pub fn offset_by(self, base: usize) -> Self {
        match self {
            CommsError::Transport {
                direction,
                offset,
                source,
            } => CommsError::Transport {
                direction,
                offset: offset + base,
                source,
            },
            other => other,
        }
    }

    /// The underlying bus error, if this is a transport failure.
    pub fn bus_error(&self) -> Option<&E> {
        match self {
            CommsError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for CommsError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommsError::Transport {
                direction,
                offset,
                source,
            } => write!(
                f,
                "bus error during {} at offset {}: {:?}",
                direction, offset, source
            ),
            CommsError::AddressOverflow { address, len } => write!(
                f,
                "{} bytes at 0x{:04X} exceed the register space",
                len, address
            ),
            CommsError::UnknownDevice {
                device_id,
                revision_id,
            } => write!(
                f,
                "unexpected device id 0x{:02X} / revision 0x{:02X}",
                device_id, revision_id
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for CommsError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CommsError::Transport {
                direction,
                offset,
                source,
            } => defmt::write!(
                f,
                "bus error during {} at offset {}: {}",
                direction,
                offset,
                source
            ),
            CommsError::AddressOverflow { address, len } => defmt::write!(
                f,
                "{} bytes at {=u16:#06x} exceed the register space",
                len,
                address
            ),
            CommsError::UnknownDevice {
                device_id,
                revision_id,
            } => defmt::write!(
                f,
                "unexpected device id {=u8:#04x} / revision {=u8:#04x}",
                device_id,
                revision_id
            ),
        }
    }
}

/// The transport selection or its parameters cannot be bound.
///
/// Surfaced at bind time. The caller has to supply a different
/// configuration; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// Neither an I2C nor an SPI backend was supplied.
    NoTransport,
    /// Both backends were supplied; exactly one may be bound.
    BothTransports,
    /// Only 8-bit SPI words are supported.
    UnsupportedWordSize(u8),
    /// SPI clock must be non-zero.
    ZeroSpeed,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::NoTransport => write!(f, "no transport bound"),
            ConfigurationError::BothTransports => {
                write!(f, "I2C and SPI transports are mutually exclusive")
            }
            ConfigurationError::UnsupportedWordSize(bits) => {
                write!(f, "unsupported SPI word size: {} bits", bits)
            }
            ConfigurationError::ZeroSpeed => write!(f, "SPI clock speed is zero"),
        }
    }
}

/// A data-ready wait was cancelled before the sensor signalled.
///
/// This is not a device failure: the readiness flag is untouched and the
/// caller may simply wait again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "wait for data ready interrupted")
    }
}

/// Bus error of a runtime-selected [`Binding`](crate::Binding), tagged with
/// the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError<I, S> {
    I2c(I),
    Spi(S),
}

#[cfg(feature = "defmt")]
impl<I: defmt::Format, S: defmt::Format> defmt::Format for BusError<I, S> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            BusError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            BusError::Spi(e) => defmt::write!(f, "SPI error: {}", e),
        }
    }
}
