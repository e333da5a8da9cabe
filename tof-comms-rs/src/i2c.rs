//! I2C backend.
//!
//! Each chunk is one address-then-data exchange: the 2-byte big-endian
//! register address followed by the data phase. Reads use a combined
//! write-read with a repeated start unless the config asks for two
//! separate transactions.

use embedded_hal_async::i2c::I2c;

use crate::config::TwoWireConfig;
use crate::registers::{ADDRESS_HEADER_LEN, I2C_CHUNK_SIZE};
use crate::transport::Transport;

/// I2C binding to one sensor.
///
/// Owns the I2C peripheral and a staging buffer that holds the address
/// header and one chunk of write data, so every write goes out as a single
/// bus message.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    config: TwoWireConfig,
    staging: [u8; ADDRESS_HEADER_LEN + I2C_CHUNK_SIZE],
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    /// Bind a sensor on `i2c` at `config.address`.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `config` — target address and transaction style
    pub fn new(i2c: I2C, config: TwoWireConfig) -> Self {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "binding I2C sensor at {=u8:#04x} (combined={})",
            config.address,
            config.combined_transaction
        );

        Self {
            i2c,
            config,
            staging: [0; ADDRESS_HEADER_LEN + I2C_CHUNK_SIZE],
        }
    }

    /// Bound configuration.
    pub fn config(&self) -> &TwoWireConfig {
        &self.config
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Transport for I2cTransport<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn chunk_size(&self) -> usize {
        I2C_CHUNK_SIZE
    }

    async fn read_chunk(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Self::Error> {
        debug_assert!(buffer.len() <= I2C_CHUNK_SIZE);
        let header = address.to_be_bytes();

        if self.config.combined_transaction {
            self.i2c
                .write_read(self.config.address, &header, buffer)
                .await?;
        } else {
            self.i2c.write(self.config.address, &header).await?;
            self.i2c.read(self.config.address, buffer).await?;
        }

        Ok(())
    }

    async fn write_chunk(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        debug_assert!(data.len() <= I2C_CHUNK_SIZE);
        let len = ADDRESS_HEADER_LEN + data.len();

        // Full write message: [address_hi, address_lo, data...]
        self.staging[..ADDRESS_HEADER_LEN].copy_from_slice(&address.to_be_bytes());
        self.staging[ADDRESS_HEADER_LEN..len].copy_from_slice(data);

        self.i2c
            .write(self.config.address, &self.staging[..len])
            .await?;

        Ok(())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
