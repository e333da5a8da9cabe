//! Register address constants and bus limits for the VL53L8CX.
//!
//! The sensor exposes a flat 16-bit register space. Every bus transaction
//! starts with a 2-byte big-endian register address; on SPI the top bit of
//! that address carries the transfer direction.

// ---------------------------------------------------------------------------
// Identity registers
// ---------------------------------------------------------------------------

/// Page-select register. Writing 0x00 selects the page holding the
/// identity registers.
pub const PAGE_SELECT: u16 = 0x7FFF;

/// Device ID register (page 0).
pub const DEVICE_ID: u16 = 0x0000;

/// Revision ID register (page 0).
pub const REVISION_ID: u16 = 0x0001;

/// Value of [`DEVICE_ID`] on a VL53L8CX.
pub const EXPECTED_DEVICE_ID: u8 = 0xF0;

/// Value of [`REVISION_ID`] on a VL53L8CX.
pub const EXPECTED_REVISION_ID: u8 = 0x0C;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Length of the register-address header sent before every data phase.
pub const ADDRESS_HEADER_LEN: usize = 2;

/// Bit folded into the SPI address header to mark a write. Cleared for reads.
pub const SPI_WRITE_BIT: u16 = 0x8000;

/// Size of the register space in bytes. A transfer must end at or before
/// this boundary.
pub const REGISTER_SPACE: usize = 0x1_0000;

/// Register space reachable over SPI. Bit 15 of the header carries the
/// direction, leaving 15 address bits.
pub const SPI_ADDRESS_SPACE: usize = 0x8000;

// ---------------------------------------------------------------------------
// Bus limits
// ---------------------------------------------------------------------------

/// Largest data phase moved in one I2C transaction. Matches the transfer
/// buffer of common I2C adapters.
pub const I2C_CHUNK_SIZE: usize = 1024;

/// Largest single SPI exchange, header included.
pub const SPI_TRANSFER_SIZE: usize = 4096;

/// Largest data phase moved in one SPI exchange.
pub const SPI_CHUNK_SIZE: usize = SPI_TRANSFER_SIZE - ADDRESS_HEADER_LEN;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default 7-bit I2C address (0x52 in 8-bit notation).
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Default SPI clock.
pub const DEFAULT_SPI_SPEED_HZ: u32 = 2_000_000;

/// Base of the external device name. A device-instance index is appended
/// when one is configured.
pub const DEVICE_NAME: &str = "vl53l8cx";
