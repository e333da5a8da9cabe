//! Bind-time configuration for the transports and the device handle.
//!
//! Nothing here is computed by the crate: the platform supplies these
//! values when it binds a sensor. [`Default`] reproduces the sensor's
//! reference wiring (I2C address 0x29, SPI mode 0 at 2 MHz).

use core::fmt::Write;

use embedded_hal::spi::{Mode, MODE_0};
use heapless::String;

use crate::error::ConfigurationError;
use crate::registers::{DEFAULT_ADDRESS, DEFAULT_SPI_SPEED_HZ, DEVICE_NAME};

// ── TwoWireConfig ────────────────────────────────────────────────────────

/// I2C target parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwoWireConfig {
    /// 7-bit target address. Default: 0x29.
    pub address: u8,
    /// Send the register address and the data phase of a read in one
    /// transaction with a repeated start. When `false` the address write
    /// and the data read are issued as two separate transactions, for
    /// adapters that cannot combine them. Default: `true`.
    pub combined_transaction: bool,
}

impl Default for TwoWireConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            combined_transaction: true,
        }
    }
}

// ── FourWireConfig ───────────────────────────────────────────────────────

/// SPI device parameters.
///
/// `mode` and `speed_hz` are applied by the platform when it configures
/// the bus behind the `SpiDevice`; the transport records them and checks
/// what it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourWireConfig {
    /// Clock polarity and phase. Default: mode 0.
    pub mode: Mode,
    /// Clock speed in Hz. Default: 2 MHz.
    pub speed_hz: u32,
    /// Word size. Only 8 is supported.
    pub bits_per_word: u8,
    /// Chip-select line the device sits on. Default: 0.
    pub chip_select: u8,
}

impl Default for FourWireConfig {
    fn default() -> Self {
        Self {
            mode: MODE_0,
            speed_hz: DEFAULT_SPI_SPEED_HZ,
            bits_per_word: 8,
            chip_select: 0,
        }
    }
}

impl FourWireConfig {
    /// Check the parameters the transport depends on.
    ///
    /// # Errors
    /// * [`ConfigurationError::UnsupportedWordSize`] unless `bits_per_word == 8`
    /// * [`ConfigurationError::ZeroSpeed`] if `speed_hz == 0`
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.bits_per_word != 8 {
            return Err(ConfigurationError::UnsupportedWordSize(self.bits_per_word));
        }
        if self.speed_hz == 0 {
            return Err(ConfigurationError::ZeroSpeed);
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FourWireConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "mode=({}, {}) speed={}Hz bits={} cs={}",
            self.mode.polarity == embedded_hal::spi::Polarity::IdleHigh,
            self.mode.phase == embedded_hal::spi::Phase::CaptureOnSecondTransition,
            self.speed_hz,
            self.bits_per_word,
            self.chip_select
        )
    }
}

// ── DeviceConfig ─────────────────────────────────────────────────────────

/// Per-device parameters that do not affect the bus protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Distinguishes several sensors of one system in the external name.
    pub instance: Option<u8>,
}

impl DeviceConfig {
    /// Config for the `instance`-th sensor of a multi-sensor setup.
    pub fn with_instance(instance: u8) -> Self {
        Self {
            instance: Some(instance),
        }
    }

    /// External name: `vl53l8cx`, or `vl53l8cx<N>` with an instance index.
    pub fn name(&self) -> String<16> {
        let mut name = String::new();
        // Longest name is "vl53l8cx255", well within capacity.
        let _ = name.push_str(DEVICE_NAME);
        if let Some(instance) = self.instance {
            let _ = write!(name, "{}", instance);
        }
        name
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
