//! The transport capability shared by the I2C and SPI backends.

use core::fmt;

use embedded_hal_async::i2c::I2c;
use embedded_hal_async::spi::SpiDevice;

use crate::error::{BusError, ConfigurationError};
use crate::i2c::I2cTransport;
use crate::registers::REGISTER_SPACE;
use crate::spi::SpiTransport;

/// Direction of a register transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "read"),
            Direction::Write => write!(f, "write"),
        }
    }
}

/// One physical bus binding to the sensor.
///
/// A backend moves at most [`chunk_size`](Self::chunk_size) bytes per call
/// and performs exactly one bus exchange for it. Backends never retry: a
/// failed exchange is returned as-is so the caller can decide what the
/// register state means.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Bus error type.
    type Error;

    /// Largest data phase a single chunk call may carry. Never zero.
    fn chunk_size(&self) -> usize;

    /// Size of the register space reachable over this bus. A transfer must
    /// end at or below it.
    fn address_limit(&self) -> usize {
        REGISTER_SPACE
    }

    /// Read `buffer.len()` bytes starting at `address`.
    ///
    /// `buffer.len()` must not exceed [`chunk_size`](Self::chunk_size).
    async fn read_chunk(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `address`.
    ///
    /// `data.len()` must not exceed [`chunk_size`](Self::chunk_size).
    async fn write_chunk(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn chunk_size(&self) -> usize {
        (**self).chunk_size()
    }

    fn address_limit(&self) -> usize {
        (**self).address_limit()
    }

    async fn read_chunk(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_chunk(address, buffer).await
    }

    async fn write_chunk(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_chunk(address, data).await
    }
}

/// Transport chosen at bind time from whichever bus the platform wired up.
///
/// Exactly one variant is ever bound; use [`Binding::select`] to build it
/// from optional backends.
pub enum Binding<I2C, SPI> {
    I2c(I2cTransport<I2C>),
    Spi(SpiTransport<SPI>),
}

impl<I2C, SPI> Binding<I2C, SPI>
where
    I2C: I2c,
    SPI: SpiDevice,
{
    /// Bind whichever backend is present.
    ///
    /// # Errors
    /// * [`ConfigurationError::NoTransport`] if both are `None`
    /// * [`ConfigurationError::BothTransports`] if both are `Some`
    pub fn select(
        i2c: Option<I2cTransport<I2C>>,
        spi: Option<SpiTransport<SPI>>,
    ) -> Result<Self, ConfigurationError> {
        match (i2c, spi) {
            (Some(i2c), None) => Ok(Binding::I2c(i2c)),
            (None, Some(spi)) => Ok(Binding::Spi(spi)),
            (None, None) => Err(ConfigurationError::NoTransport),
            (Some(_), Some(_)) => Err(ConfigurationError::BothTransports),
        }
    }

    /// Whether the I2C backend is the bound one.
    pub fn is_i2c(&self) -> bool {
        matches!(self, Binding::I2c(_))
    }
}

impl<I2C, SPI> Transport for Binding<I2C, SPI>
where
    I2C: I2c,
    SPI: SpiDevice,
{
    type Error = BusError<I2C::Error, SPI::Error>;

    fn chunk_size(&self) -> usize {
        match self {
            Binding::I2c(bus) => bus.chunk_size(),
            Binding::Spi(bus) => bus.chunk_size(),
        }
    }

    fn address_limit(&self) -> usize {
        match self {
            Binding::I2c(bus) => bus.address_limit(),
            Binding::Spi(bus) => bus.address_limit(),
        }
    }

    async fn read_chunk(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Self::Error> {
        match self {
            Binding::I2c(bus) => bus.read_chunk(address, buffer).await.map_err(BusError::I2c),
            Binding::Spi(bus) => bus.read_chunk(address, buffer).await.map_err(BusError::Spi),
        }
    }

    async fn write_chunk(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        match self {
            Binding::I2c(bus) => bus.write_chunk(address, data).await.map_err(BusError::I2c),
            Binding::Spi(bus) => bus.write_chunk(address, data).await.map_err(BusError::Spi),
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
