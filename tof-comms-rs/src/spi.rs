//! SPI backend.
//!
//! Every chunk is one full-duplex exchange with chip select held for its
//! whole length: a 2-byte address header, direction in bit 15 (set for
//! write, clear for read), followed by the data phase. Read data is
//! captured from the bytes clocked in after the header.
//!
//! With bit 15 taken by the direction, only registers 0x0000..=0x7FFF are
//! reachable; the transport reports that through `address_limit`.

use embedded_hal_async::spi::SpiDevice;

use crate::config::FourWireConfig;
use crate::error::ConfigurationError;
use crate::registers::{
    ADDRESS_HEADER_LEN, SPI_ADDRESS_SPACE, SPI_CHUNK_SIZE, SPI_TRANSFER_SIZE, SPI_WRITE_BIT,
};
use crate::transport::Transport;

/// SPI binding to one sensor.
///
/// Owns the SPI device and an exchange buffer sized to the platform's
/// largest SPI transfer.
pub struct SpiTransport<SPI> {
    spi: SPI,
    config: FourWireConfig,
    exchange: [u8; SPI_TRANSFER_SIZE],
}

impl<SPI> SpiTransport<SPI>
where
    SPI: SpiDevice,
{
    /// Bind a sensor on `spi`.
    ///
    /// # Arguments
    /// * `spi` — SPI device with its chip select (takes ownership)
    /// * `config` — bus parameters the platform configured `spi` with
    ///
    /// # Errors
    /// Whatever [`FourWireConfig::validate`] rejects.
    pub fn new(spi: SPI, config: FourWireConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        #[cfg(feature = "defmt")]
        defmt::info!("binding SPI sensor: {}", config);

        Ok(Self {
            spi,
            config,
            exchange: [0; SPI_TRANSFER_SIZE],
        })
    }

    /// Bound configuration.
    pub fn config(&self) -> &FourWireConfig {
        &self.config
    }

    /// Give the SPI device back.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Transport for SpiTransport<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn chunk_size(&self) -> usize {
        SPI_CHUNK_SIZE
    }

    fn address_limit(&self) -> usize {
        SPI_ADDRESS_SPACE
    }

    async fn read_chunk(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Self::Error> {
        debug_assert!(buffer.len() <= SPI_CHUNK_SIZE);
        debug_assert!(address & SPI_WRITE_BIT == 0);
        let len = ADDRESS_HEADER_LEN + buffer.len();
        let header = address.to_be_bytes();

        let exchange = &mut self.exchange[..len];
        exchange[..ADDRESS_HEADER_LEN].copy_from_slice(&header);
        exchange[ADDRESS_HEADER_LEN..].fill(0);

        self.spi.transfer_in_place(exchange).await?;

        buffer.copy_from_slice(&exchange[ADDRESS_HEADER_LEN..]);
        Ok(())
    }

    async fn write_chunk(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        debug_assert!(data.len() <= SPI_CHUNK_SIZE);
        debug_assert!(address & SPI_WRITE_BIT == 0);
        let len = ADDRESS_HEADER_LEN + data.len();
        let header = (address | SPI_WRITE_BIT).to_be_bytes();

        let exchange = &mut self.exchange[..len];
        exchange[..ADDRESS_HEADER_LEN].copy_from_slice(&header);
        exchange[ADDRESS_HEADER_LEN..].copy_from_slice(data);

        // Full duplex; whatever the sensor clocks back during a write is
        // discarded.
        self.spi.transfer_in_place(exchange).await?;

        Ok(())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockSpi, RegisterSpace};
    use embassy_futures::block_on;

    fn transport() -> SpiTransport<MockSpi> {
        SpiTransport::new(MockSpi::new(RegisterSpace::new()), FourWireConfig::default()).unwrap()
    }

    #[test]
    fn new_validates_config() {
        let config = FourWireConfig {
            bits_per_word: 9,
            ..FourWireConfig::default()
        };
        let result = SpiTransport::new(MockSpi::new(RegisterSpace::new()), config);
        assert_eq!(result.err(), Some(ConfigurationError::UnsupportedWordSize(9)));
    }

    #[test]
    fn read_clears_direction_bit() {
        let mut bus = transport();
        let mut buf = [0u8; 2];
        block_on(bus.read_chunk(0x7FFF, &mut buf)).unwrap();

        let spi = bus.release();
        assert_eq!(spi.exchanges.len(), 1);
        assert_eq!(&spi.exchanges[0][..2], &[0x7F, 0xFF]);
        assert_eq!(spi.exchanges[0].len(), 4);
    }

    #[test]
    fn write_sets_direction_bit() {
        let mut bus = transport();
        block_on(bus.write_chunk(0x0102, &[0xAA, 0xBB])).unwrap();

        let spi = bus.release();
        assert_eq!(spi.exchanges, vec![vec![0x81, 0x02, 0xAA, 0xBB]]);
        assert_eq!(spi.space.slice(0x0102, 2), &[0xAA, 0xBB]);
    }

    #[test]
    fn read_data_follows_header() {
        let mut space = RegisterSpace::new();
        space.load(0x2000, &[0x11, 0x22, 0x33]);
        let mut bus =
            SpiTransport::new(MockSpi::new(space), FourWireConfig::default()).unwrap();

        let mut buf = [0u8; 3];
        block_on(bus.read_chunk(0x2000, &mut buf)).unwrap();
        assert_eq!(buf, [0x11, 0x22, 0x33]);
    }

    #[test]
    fn full_chunk_fits_exchange_buffer() {
        let mut bus = transport();
        let data = [0xC3u8; SPI_CHUNK_SIZE];
        block_on(bus.write_chunk(0x0000, &data)).unwrap();

        let mut back = [0u8; SPI_CHUNK_SIZE];
        block_on(bus.read_chunk(0x0000, &mut back)).unwrap();
        assert_eq!(back, data);
    }
}
